use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Get like counts for multiple posts
pub async fn count_likes_batch(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT post_id, COUNT(*) as count
        FROM post_likes
        WHERE post_id = ANY($1)
        GROUP BY post_id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let counts = rows
        .into_iter()
        .map(|row| {
            let post_id: Uuid = row.get("post_id");
            let count: i64 = row.get("count");
            (post_id, count)
        })
        .collect();

    Ok(counts)
}

/// Get comment counts for multiple posts
pub async fn count_comments_batch(
    pool: &PgPool,
    post_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT post_id, COUNT(*) as count
        FROM post_comments
        WHERE post_id = ANY($1)
        GROUP BY post_id
        "#,
    )
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    let counts = rows
        .into_iter()
        .map(|row| {
            let post_id: Uuid = row.get("post_id");
            let count: i64 = row.get("count");
            (post_id, count)
        })
        .collect();

    Ok(counts)
}

/// Of the given posts, which ones the viewer has liked.
pub async fn liked_post_ids(
    pool: &PgPool,
    viewer_id: Uuid,
    post_ids: &[Uuid],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (Uuid,)>(
        r#"
        SELECT post_id
        FROM post_likes
        WHERE user_id = $1 AND post_id = ANY($2)
        "#,
    )
    .bind(viewer_id)
    .bind(post_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(post_id,)| post_id).collect())
}
