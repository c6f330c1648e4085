use crate::cursor::{RankedCursor, RecencyCursor};
use crate::error::FeedQueryError;
use crate::models::{AuthorRole, MediaAttachment, Post, SubscriptionTier};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, author_id, author_role, author_tier, priority_rank, is_pinned, \
                            content, media, created_at, updated_at, deleted_at";

/// Fetch one page of the ranked feed shape.
///
/// Orders by (is_pinned DESC, priority_rank ASC, created_at DESC, id DESC).
/// When a cursor is supplied only rows strictly after it in that order
/// qualify, expressed as a compound inequality rather than an offset so that
/// inserts and deletes elsewhere in the table never shift the page boundary.
pub async fn fetch_ranked_page(
    pool: &PgPool,
    cursor: Option<&RankedCursor>,
    limit: i64,
) -> Result<Vec<Post>, FeedQueryError> {
    let result = match cursor {
        Some(c) => {
            sqlx::query_as::<_, Post>(&format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts
                WHERE deleted_at IS NULL
                  AND (
                    is_pinned < $1
                    OR (is_pinned = $1 AND priority_rank > $2)
                    OR (is_pinned = $1 AND priority_rank = $2 AND created_at < $3)
                    OR (is_pinned = $1 AND priority_rank = $2 AND created_at = $3 AND id < $4)
                  )
                ORDER BY is_pinned DESC, priority_rank ASC, created_at DESC, id DESC
                LIMIT $5
                "#
            ))
            .bind(c.pinned)
            .bind(c.rank)
            .bind(c.created_at)
            .bind(c.id)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Post>(&format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts
                WHERE deleted_at IS NULL
                ORDER BY is_pinned DESC, priority_rank ASC, created_at DESC, id DESC
                LIMIT $1
                "#
            ))
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    };

    result.map_err(FeedQueryError::from_ranked_query)
}

/// Fetch one page of the recency (fallback) feed shape: same filter, ordered
/// by (created_at DESC, id DESC) only. Used while the ranking columns are
/// not queryable.
pub async fn fetch_recency_page(
    pool: &PgPool,
    cursor: Option<&RecencyCursor>,
    limit: i64,
) -> Result<Vec<Post>, sqlx::Error> {
    match cursor {
        Some(c) => {
            sqlx::query_as::<_, Post>(&format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts
                WHERE deleted_at IS NULL
                  AND (created_at < $1 OR (created_at = $1 AND id < $2))
                ORDER BY created_at DESC, id DESC
                LIMIT $3
                "#
            ))
            .bind(c.created_at)
            .bind(c.id)
            .bind(limit)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Post>(&format!(
                r#"
                SELECT {POST_COLUMNS}
                FROM posts
                WHERE deleted_at IS NULL
                ORDER BY created_at DESC, id DESC
                LIMIT $1
                "#
            ))
            .bind(limit)
            .fetch_all(pool)
            .await
        }
    }
}

/// Create a new post. The role, tier, and priority rank snapshots are
/// persisted in the same insert as the row; no later write touches them.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    role: AuthorRole,
    tier: SubscriptionTier,
    priority_rank: i32,
    content: Option<&str>,
    media: &[MediaAttachment],
) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        INSERT INTO posts (author_id, author_role, author_tier, priority_rank, is_pinned, content, media)
        VALUES ($1, $2, $3, $4, FALSE, $5, $6)
        RETURNING {POST_COLUMNS}
        "#
    ))
    .bind(author_id)
    .bind(role.as_str())
    .bind(tier.as_str())
    .bind(priority_rank)
    .bind(content)
    .bind(Json(media))
    .fetch_one(pool)
    .await
}

/// Find a post by ID (excluding soft-deleted posts)
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        WHERE id = $1 AND deleted_at IS NULL
        "#
    ))
    .bind(post_id)
    .fetch_optional(pool)
    .await
}

/// Soft delete a post owned by `author_id`. Returns whether a row changed.
pub async fn soft_delete_post(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET deleted_at = NOW(), updated_at = NOW()
        WHERE id = $1 AND author_id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(post_id)
    .bind(author_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Toggle the pinned flag on a post. Returns whether a row changed.
pub async fn set_pinned(pool: &PgPool, post_id: Uuid, pinned: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET is_pinned = $1, updated_at = NOW()
        WHERE id = $2 AND deleted_at IS NULL
        "#,
    )
    .bind(pinned)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
