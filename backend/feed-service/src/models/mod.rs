/// Data models for feed-service
///
/// This module defines structures for:
/// - Post: community feed posts with inline media attachments
/// - AuthorRole / SubscriptionTier: enumerations snapshotted onto posts
/// - FeedPost / FeedResponse: the enriched shapes returned by the HTTP API
/// - Collaborator rows (profiles, vendor subscriptions, memberships) this
///   service reads but does not own
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Account role of a post's author, snapshotted at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorRole {
    Admin,
    Vendor,
    Consumer,
    Affiliate,
    Driver,
}

impl AuthorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorRole::Admin => "admin",
            AuthorRole::Vendor => "vendor",
            AuthorRole::Consumer => "consumer",
            AuthorRole::Affiliate => "affiliate",
            AuthorRole::Driver => "driver",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(AuthorRole::Admin),
            "vendor" => Some(AuthorRole::Vendor),
            "consumer" => Some(AuthorRole::Consumer),
            "affiliate" => Some(AuthorRole::Affiliate),
            "driver" => Some(AuthorRole::Driver),
            _ => None,
        }
    }
}

/// Subscription tier of a post's author, snapshotted at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionTier {
    None,
    Starter,
    Pro,
    Enterprise,
    Vip,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::None => "none",
            SubscriptionTier::Starter => "starter",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
            SubscriptionTier::Vip => "vip",
        }
    }
}

/// Media attachment type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

/// One media attachment on a post, stored inline on the row in the order
/// the author attached it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub media_type: MediaType,
    pub url: String,
}

/// A feed post row. `author_role`, `author_tier` and `priority_rank` are
/// materialized once at creation and never recomputed; a later subscription
/// change does not move posts that already exist.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_role: String,
    pub author_tier: String,
    pub priority_rank: i32,
    pub is_pinned: bool,
    pub content: Option<String>,
    pub media: Json<Vec<MediaAttachment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Resolved author identity attached to each post in a page.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub verified: bool,
}

/// One enriched post as returned by the read and write endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPost {
    pub id: Uuid,
    pub author: AuthorSummary,
    pub content: Option<String>,
    pub media: Vec<MediaAttachment>,
    pub priority_rank: i32,
    pub is_pinned: bool,
    pub like_count: i64,
    pub viewer_has_liked: bool,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response body for GET /api/v1/feed.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
    pub next_cursor: Option<String>,
}

/// Display identity row from the user store.
#[derive(Debug, Clone, FromRow)]
pub struct AuthorProfile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

/// Subscription facts for a vendor author, joined against the plan table.
#[derive(Debug, Clone, FromRow)]
pub struct VendorSubscription {
    pub subscription_status: Option<String>,
    pub plan_name: Option<String>,
    pub seller_tier: Option<String>,
}

/// Latest membership record for a consumer author.
#[derive(Debug, Clone, FromRow)]
pub struct ConsumerMembership {
    pub status: String,
    pub plan_key: Option<String>,
}
