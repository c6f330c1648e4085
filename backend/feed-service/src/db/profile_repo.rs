use crate::models::AuthorProfile;
use sqlx::PgPool;
use uuid::Uuid;

/// Get display identity for multiple users in one query.
pub async fn fetch_profiles(
    pool: &PgPool,
    user_ids: &[Uuid],
) -> Result<Vec<AuthorProfile>, sqlx::Error> {
    sqlx::query_as::<_, AuthorProfile>(
        r#"
        SELECT id, display_name, username, avatar_url
        FROM users
        WHERE id = ANY($1)
        "#,
    )
    .bind(user_ids)
    .fetch_all(pool)
    .await
}

/// Get the account role string for a user.
pub async fn fetch_account_role(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT account_role
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(role,)| role))
}
