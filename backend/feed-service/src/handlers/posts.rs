/// Post handlers - HTTP endpoints for post operations
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::UserId;
use crate::models::AuthorRole;
use crate::services::posts::CreatePostRequest;
use crate::services::{FeedService, PostService};

/// Create a new post
///
/// Returns the created post in the same enriched shape as the feed, with a
/// freshly computed priority rank and zero engagement counts.
pub async fn create_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let post = service.create_post(user_id.0, &req).await?;

    let enriched = FeedService::new((**pool).clone())
        .enrich_post(post, Some(user_id.0))
        .await;

    Ok(HttpResponse::Created().json(enriched))
}

/// Get a post by ID
pub async fn get_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());

    match service.get_post(*post_id).await? {
        Some(post) => {
            let enriched = FeedService::new((**pool).clone())
                .enrich_post(post, Some(user_id.0))
                .await;
            Ok(HttpResponse::Ok().json(enriched))
        }
        None => Ok(HttpResponse::NotFound().finish()),
    }
}

/// Delete a post (soft delete, owner only)
pub async fn delete_post(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());
    let deleted = service.delete_post(*post_id, user_id.0).await?;

    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub pinned: bool,
}

/// Pin or unpin a post (administrators only). Pinned posts sort before all
/// unpinned posts regardless of priority rank.
pub async fn set_pinned(
    pool: web::Data<PgPool>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<PinRequest>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());

    let role = service.account_role(user_id.0).await?;
    if role != AuthorRole::Admin {
        return Err(AppError::Forbidden(
            "Only administrators can pin posts".to_string(),
        ));
    }

    let updated = service.set_pinned(*post_id, req.pinned).await?;

    if updated {
        Ok(HttpResponse::Ok().finish())
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}
