//! Post write path.
//!
//! Validation happens before any side effect; the author's role and
//! subscription facts are read fresh on every write, and the resulting
//! priority rank is persisted in the same insert as the post row. There is
//! no job that re-ranks existing posts when a tier later changes.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::db::{membership_repo, post_repo, profile_repo, vendor_repo};
use crate::error::{AppError, Result};
use crate::models::{AuthorRole, MediaAttachment, Post, SubscriptionTier};
use crate::services::tiers;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(max = 2000, message = "content exceeds the 2000 character limit"))]
    pub content: Option<String>,
    #[validate(length(max = 4, message = "a post can carry at most 4 media attachments"))]
    #[serde(default)]
    pub media: Vec<MediaAttachment>,
}

/// Check the composition rules and return the trimmed content, if any.
fn validate_composition(req: &CreatePostRequest) -> std::result::Result<Option<&str>, String> {
    req.validate().map_err(|e| e.to_string())?;

    let content = req
        .content
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    if content.is_none() && req.media.is_empty() {
        return Err("a post needs content or at least one media attachment".to_string());
    }

    Ok(content)
}

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post with its priority rank materialized at write time.
    pub async fn create_post(&self, author_id: Uuid, req: &CreatePostRequest) -> Result<Post> {
        let content = validate_composition(req).map_err(AppError::Validation)?;

        let role = self.account_role(author_id).await?;
        let tier = self.current_tier(author_id, role).await;
        let rank = tiers::priority_rank(role, tier);

        let post =
            post_repo::create_post(&self.pool, author_id, role, tier, rank, content, &req.media)
                .await?;

        Ok(post)
    }

    /// Get a post by ID (soft-deleted posts excluded)
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        Ok(post_repo::find_post_by_id(&self.pool, post_id).await?)
    }

    /// Soft delete a post owned by the caller
    pub async fn delete_post(&self, post_id: Uuid, author_id: Uuid) -> Result<bool> {
        Ok(post_repo::soft_delete_post(&self.pool, post_id, author_id).await?)
    }

    /// Toggle the pinned flag on a post
    pub async fn set_pinned(&self, post_id: Uuid, pinned: bool) -> Result<bool> {
        Ok(post_repo::set_pinned(&self.pool, post_id, pinned).await?)
    }

    /// Resolve the caller's account role from the user store.
    pub async fn account_role(&self, user_id: Uuid) -> Result<AuthorRole> {
        let raw = profile_repo::fetch_account_role(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown author account".to_string()))?;

        AuthorRole::parse(&raw)
            .ok_or_else(|| AppError::Internal(format!("Unrecognized account role '{}'", raw)))
    }

    /// Subscription facts for the tier are read fresh, never cached. A
    /// failed fact lookup resolves to the unsubscribed tier instead of
    /// failing the write.
    async fn current_tier(&self, author_id: Uuid, role: AuthorRole) -> SubscriptionTier {
        match role {
            AuthorRole::Vendor => {
                let facts = match vendor_repo::fetch_vendor_subscription(&self.pool, author_id)
                    .await
                {
                    Ok(facts) => facts,
                    Err(err) => {
                        warn!(
                            "Vendor subscription lookup failed for {}, assuming no tier: {}",
                            author_id, err
                        );
                        None
                    }
                };
                tiers::resolve_tier(role, facts.as_ref(), None)
            }
            AuthorRole::Consumer => {
                let facts = match membership_repo::fetch_membership(&self.pool, author_id).await {
                    Ok(facts) => facts,
                    Err(err) => {
                        warn!(
                            "Membership lookup failed for {}, assuming no tier: {}",
                            author_id, err
                        );
                        None
                    }
                };
                tiers::resolve_tier(role, None, facts.as_ref())
            }
            _ => SubscriptionTier::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn media(n: usize) -> Vec<MediaAttachment> {
        (0..n)
            .map(|i| MediaAttachment {
                media_type: MediaType::Image,
                url: format!("https://cdn.example.com/m/{i}.jpg"),
            })
            .collect()
    }

    #[test]
    fn test_empty_post_is_rejected() {
        let req = CreatePostRequest {
            content: None,
            media: Vec::new(),
        };
        assert!(validate_composition(&req).is_err());

        let req = CreatePostRequest {
            content: Some("   ".to_string()),
            media: Vec::new(),
        };
        assert!(validate_composition(&req).is_err());
    }

    #[test]
    fn test_media_only_post_is_accepted() {
        let req = CreatePostRequest {
            content: None,
            media: media(1),
        };
        assert_eq!(validate_composition(&req).unwrap(), None);
    }

    #[test]
    fn test_content_is_trimmed() {
        let req = CreatePostRequest {
            content: Some("  new stock this week  ".to_string()),
            media: Vec::new(),
        };
        assert_eq!(
            validate_composition(&req).unwrap(),
            Some("new stock this week")
        );
    }

    #[test]
    fn test_oversized_content_is_rejected() {
        let req = CreatePostRequest {
            content: Some("x".repeat(2001)),
            media: Vec::new(),
        };
        assert!(validate_composition(&req).is_err());

        let req = CreatePostRequest {
            content: Some("x".repeat(2000)),
            media: Vec::new(),
        };
        assert!(validate_composition(&req).is_ok());
    }

    #[test]
    fn test_too_many_media_items_rejected() {
        let req = CreatePostRequest {
            content: None,
            media: media(5),
        };
        assert!(validate_composition(&req).is_err());

        let req = CreatePostRequest {
            content: None,
            media: media(4),
        };
        assert!(validate_composition(&req).is_ok());
    }
}
