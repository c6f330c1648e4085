use crate::models::ConsumerMembership;
use sqlx::PgPool;
use uuid::Uuid;

/// Latest membership record for a consumer, if any.
pub async fn fetch_membership(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ConsumerMembership>, sqlx::Error> {
    sqlx::query_as::<_, ConsumerMembership>(
        r#"
        SELECT status, plan_key
        FROM memberships
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
