//! Author tiering and feed priority.
//!
//! Tier resolution is a pure function over subscription facts the write path
//! fetches fresh from the vendor and membership stores. The priority rank it
//! feeds is materialized on the post row at creation and never recomputed,
//! so a later subscription change does not move posts that already exist.

use crate::models::{AuthorRole, ConsumerMembership, SubscriptionTier, VendorSubscription};

/// Subscription statuses that grant a paid tier.
const ENTITLED_STATUSES: [&str; 2] = ["active", "trialing"];

fn entitled(status: Option<&str>) -> bool {
    status
        .map(|s| ENTITLED_STATUSES.contains(&s))
        .unwrap_or(false)
}

/// Resolve the current tier for an author from their subscription facts.
/// Roles without a subscription surface always resolve to `None`.
pub fn resolve_tier(
    role: AuthorRole,
    vendor: Option<&VendorSubscription>,
    membership: Option<&ConsumerMembership>,
) -> SubscriptionTier {
    match role {
        AuthorRole::Vendor => resolve_vendor_tier(vendor),
        AuthorRole::Consumer => resolve_consumer_tier(membership),
        AuthorRole::Admin | AuthorRole::Affiliate | AuthorRole::Driver => SubscriptionTier::None,
    }
}

/// Vendors with a plan map by plan-name substring; vendors without a plan
/// identifier fall back to the coarse seller-tier field.
fn resolve_vendor_tier(sub: Option<&VendorSubscription>) -> SubscriptionTier {
    let Some(sub) = sub else {
        return SubscriptionTier::None;
    };

    if !entitled(sub.subscription_status.as_deref()) {
        return SubscriptionTier::None;
    }

    if let Some(plan) = sub.plan_name.as_deref() {
        let plan = plan.to_lowercase();
        return if plan.contains("elite") {
            SubscriptionTier::Vip
        } else if plan.contains("enterprise") {
            SubscriptionTier::Enterprise
        } else if plan.contains("pro") {
            SubscriptionTier::Pro
        } else if plan.contains("basic") {
            SubscriptionTier::Starter
        } else {
            SubscriptionTier::None
        };
    }

    match sub.seller_tier.as_deref() {
        Some("top") => SubscriptionTier::Enterprise,
        Some("mid") => SubscriptionTier::Pro,
        Some("starter") => SubscriptionTier::Starter,
        _ => SubscriptionTier::None,
    }
}

fn resolve_consumer_tier(membership: Option<&ConsumerMembership>) -> SubscriptionTier {
    let Some(membership) = membership else {
        return SubscriptionTier::None;
    };

    if !entitled(Some(membership.status.as_str())) {
        return SubscriptionTier::None;
    }

    let plan = membership
        .plan_key
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    if plan.contains("vip") || plan.contains("premium") {
        SubscriptionTier::Vip
    } else {
        SubscriptionTier::Starter
    }
}

/// Feed priority for a (role, tier) pair. Lower ranks sort first.
///
/// Admin posts outrank every non-admin combination regardless of tier, so
/// all admin pairs collapse to rank 0. Every non-admin pair maps to its own
/// constant, keeping the order strict across pairs.
pub fn priority_rank(role: AuthorRole, tier: SubscriptionTier) -> i32 {
    use AuthorRole::*;
    use SubscriptionTier as Tier;

    match (role, tier) {
        (Admin, _) => 0,

        (Vendor, Tier::Vip) => 100,
        (Vendor, Tier::Enterprise) => 150,
        (Vendor, Tier::Pro) => 200,
        (Vendor, Tier::Starter) => 250,
        (Vendor, Tier::None) => 300,

        (Consumer, Tier::Vip) => 350,
        (Consumer, Tier::Enterprise) => 380,
        (Consumer, Tier::Pro) => 420,
        (Consumer, Tier::Starter) => 450,
        (Consumer, Tier::None) => 500,

        (Affiliate, Tier::Vip) => 550,
        (Affiliate, Tier::Enterprise) => 580,
        (Affiliate, Tier::Pro) => 620,
        (Affiliate, Tier::Starter) => 650,
        (Affiliate, Tier::None) => 700,

        (Driver, Tier::Vip) => 750,
        (Driver, Tier::Enterprise) => 780,
        (Driver, Tier::Pro) => 820,
        (Driver, Tier::Starter) => 850,
        (Driver, Tier::None) => 900,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [AuthorRole; 5] = [
        AuthorRole::Admin,
        AuthorRole::Vendor,
        AuthorRole::Consumer,
        AuthorRole::Affiliate,
        AuthorRole::Driver,
    ];

    const TIERS: [SubscriptionTier; 5] = [
        SubscriptionTier::None,
        SubscriptionTier::Starter,
        SubscriptionTier::Pro,
        SubscriptionTier::Enterprise,
        SubscriptionTier::Vip,
    ];

    fn vendor_sub(
        status: Option<&str>,
        plan_name: Option<&str>,
        seller_tier: Option<&str>,
    ) -> VendorSubscription {
        VendorSubscription {
            subscription_status: status.map(str::to_string),
            plan_name: plan_name.map(str::to_string),
            seller_tier: seller_tier.map(str::to_string),
        }
    }

    fn membership(status: &str, plan_key: Option<&str>) -> ConsumerMembership {
        ConsumerMembership {
            status: status.to_string(),
            plan_key: plan_key.map(str::to_string),
        }
    }

    #[test]
    fn test_admin_outranks_every_other_pair() {
        for admin_tier in TIERS {
            let admin_rank = priority_rank(AuthorRole::Admin, admin_tier);
            for role in ROLES {
                if role == AuthorRole::Admin {
                    continue;
                }
                for tier in TIERS {
                    assert!(
                        admin_rank < priority_rank(role, tier),
                        "admin/{:?} must outrank {:?}/{:?}",
                        admin_tier,
                        role,
                        tier
                    );
                }
            }
        }
    }

    #[test]
    fn test_rank_is_deterministic() {
        for role in ROLES {
            for tier in TIERS {
                assert_eq!(priority_rank(role, tier), priority_rank(role, tier));
            }
        }
    }

    #[test]
    fn test_non_admin_pairs_have_distinct_ranks() {
        let mut seen = std::collections::HashSet::new();
        for role in ROLES {
            if role == AuthorRole::Admin {
                continue;
            }
            for tier in TIERS {
                assert!(seen.insert(priority_rank(role, tier)));
            }
        }
    }

    #[test]
    fn test_worked_example_ranks() {
        assert_eq!(priority_rank(AuthorRole::Admin, SubscriptionTier::None), 0);
        assert_eq!(priority_rank(AuthorRole::Vendor, SubscriptionTier::Vip), 100);
        assert_eq!(
            priority_rank(AuthorRole::Consumer, SubscriptionTier::None),
            500
        );
    }

    #[test]
    fn test_vendor_plan_name_mapping() {
        let cases = [
            ("Elite Seller", SubscriptionTier::Vip),
            ("Enterprise Annual", SubscriptionTier::Enterprise),
            ("Pro Monthly", SubscriptionTier::Pro),
            ("Basic", SubscriptionTier::Starter),
            ("Legacy Plan", SubscriptionTier::None),
        ];

        for (plan, expected) in cases {
            let sub = vendor_sub(Some("active"), Some(plan), None);
            assert_eq!(
                resolve_tier(AuthorRole::Vendor, Some(&sub), None),
                expected,
                "plan {plan}"
            );
        }
    }

    #[test]
    fn test_vendor_coarse_tier_fallback() {
        let cases = [
            (Some("top"), SubscriptionTier::Enterprise),
            (Some("mid"), SubscriptionTier::Pro),
            (Some("starter"), SubscriptionTier::Starter),
            (Some("unknown"), SubscriptionTier::None),
            (None, SubscriptionTier::None),
        ];

        for (seller_tier, expected) in cases {
            let sub = vendor_sub(Some("trialing"), None, seller_tier);
            assert_eq!(resolve_tier(AuthorRole::Vendor, Some(&sub), None), expected);
        }
    }

    #[test]
    fn test_inactive_vendor_resolves_to_none() {
        let sub = vendor_sub(Some("past_due"), Some("Elite Seller"), Some("top"));
        assert_eq!(
            resolve_tier(AuthorRole::Vendor, Some(&sub), None),
            SubscriptionTier::None
        );

        let sub = vendor_sub(None, Some("Elite Seller"), None);
        assert_eq!(
            resolve_tier(AuthorRole::Vendor, Some(&sub), None),
            SubscriptionTier::None
        );
    }

    #[test]
    fn test_consumer_membership_mapping() {
        let vip = membership("active", Some("vip-annual"));
        assert_eq!(
            resolve_tier(AuthorRole::Consumer, None, Some(&vip)),
            SubscriptionTier::Vip
        );

        let premium = membership("trialing", Some("premium_monthly"));
        assert_eq!(
            resolve_tier(AuthorRole::Consumer, None, Some(&premium)),
            SubscriptionTier::Vip
        );

        let plus = membership("active", Some("plus"));
        assert_eq!(
            resolve_tier(AuthorRole::Consumer, None, Some(&plus)),
            SubscriptionTier::Starter
        );

        let canceled = membership("canceled", Some("vip-annual"));
        assert_eq!(
            resolve_tier(AuthorRole::Consumer, None, Some(&canceled)),
            SubscriptionTier::None
        );
    }

    #[test]
    fn test_missing_facts_resolve_to_none() {
        assert_eq!(
            resolve_tier(AuthorRole::Vendor, None, None),
            SubscriptionTier::None
        );
        assert_eq!(
            resolve_tier(AuthorRole::Consumer, None, None),
            SubscriptionTier::None
        );
    }

    #[test]
    fn test_roles_without_subscriptions_resolve_to_none() {
        let sub = vendor_sub(Some("active"), Some("Elite Seller"), None);
        let vip = membership("active", Some("vip"));

        for role in [AuthorRole::Admin, AuthorRole::Affiliate, AuthorRole::Driver] {
            assert_eq!(
                resolve_tier(role, Some(&sub), Some(&vip)),
                SubscriptionTier::None
            );
        }
    }
}
