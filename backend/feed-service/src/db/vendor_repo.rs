use crate::models::VendorSubscription;
use sqlx::PgPool;
use uuid::Uuid;

/// Of the given users, which ones are verified vendors (badge holders).
pub async fn fetch_verified_vendor_ids(
    pool: &PgPool,
    user_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT user_id
        FROM vendors
        WHERE user_id = ANY($1) AND is_verified
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
}

/// Current subscription facts for a vendor, with the plan name resolved.
/// The plan join is optional so vendors on the coarse seller-tier field
/// still resolve.
pub async fn fetch_vendor_subscription(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<VendorSubscription>, sqlx::Error> {
    sqlx::query_as::<_, VendorSubscription>(
        r#"
        SELECT v.subscription_status, p.name AS plan_name, v.seller_tier
        FROM vendors v
        LEFT JOIN subscription_plans p ON p.id = v.subscription_plan_id
        WHERE v.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
