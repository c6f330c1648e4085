use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::error::Result;
use crate::middleware::Viewer;
use crate::models::FeedResponse;
use crate::services::feed::{FeedService, DEFAULT_PAGE_SIZE};

#[derive(Debug, Deserialize)]
pub struct FeedQueryParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub cursor: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// GET /api/v1/feed
///
/// Anonymous viewers are served with `viewer_has_liked` always false. A
/// transient store failure degrades to an empty page with no cursor rather
/// than an error status, so a broken feed never blocks page rendering.
pub async fn get_feed(
    pool: web::Data<PgPool>,
    query: web::Query<FeedQueryParams>,
    viewer: Viewer,
) -> Result<HttpResponse> {
    debug!(
        "Feed request: viewer={:?} limit={} cursor={}",
        viewer.0,
        query.limit,
        query.cursor.is_some()
    );

    let service = FeedService::new((**pool).clone());

    let response = match service
        .get_feed(viewer.0, query.limit, query.cursor.as_deref())
        .await
    {
        Ok(page) => page,
        Err(e) => {
            warn!("Feed read failed, serving empty page: {}", e);
            FeedResponse {
                posts: Vec::new(),
                next_cursor: None,
            }
        }
    };

    Ok(HttpResponse::Ok().json(response))
}
