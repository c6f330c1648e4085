//! Feed assembly: the ranked page query with its degradation supervisor,
//! cursor minting, and best-effort enrichment.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cursor::FeedCursor;
use crate::db::{engagement_repo, post_repo, profile_repo, vendor_repo};
use crate::error::{FeedQueryError, Result};
use crate::metrics::feed::{
    FEED_FALLBACK_TOTAL, FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL,
};
use crate::models::{AuthorProfile, AuthorSummary, FeedPost, FeedResponse, Post};

/// Page size served when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Hard cap on the page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Which query shape produced a page; decides the cursor mode minted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedMode {
    Ranked,
    Recency,
}

impl FeedMode {
    fn label(self) -> &'static str {
        match self {
            FeedMode::Ranked => "ranked",
            FeedMode::Recency => "fallback",
        }
    }
}

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Serve one feed page for a (possibly anonymous) viewer.
    pub async fn get_feed(
        &self,
        viewer: Option<Uuid>,
        limit: u32,
        cursor_token: Option<&str>,
    ) -> Result<FeedResponse> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE) as i64;

        let cursor = cursor_token.and_then(|token| {
            let decoded = FeedCursor::decode(token);
            if decoded.is_none() {
                debug!("Malformed feed cursor, restarting from the top");
            }
            decoded
        });

        let start = Instant::now();

        // One extra row tells us whether another page exists; it is dropped
        // before the response and never enriched.
        let (mut rows, mode) = self.fetch_page(cursor.as_ref(), limit + 1).await?;

        let has_more = rows.len() as i64 > limit;
        if has_more {
            rows.truncate(limit as usize);
        }

        let next_cursor = if has_more {
            rows.last().map(|last| match mode {
                FeedMode::Ranked => FeedCursor::ranked(last).encode(),
                FeedMode::Recency => FeedCursor::recency(last).encode(),
            })
        } else {
            None
        };

        let posts = self.enrich_posts(rows, viewer).await;

        FEED_REQUEST_TOTAL.with_label_values(&[mode.label()]).inc();
        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&[mode.label()])
            .observe(start.elapsed().as_secs_f64());

        Ok(FeedResponse { posts, next_cursor })
    }

    /// Run the ranked shape first; on the one retryable error kind (ranking
    /// columns not queryable yet) retry exactly once with the recency shape.
    /// A cursor minted in the other mode is ignored, restarting from the
    /// top rather than silently misordering the walk.
    async fn fetch_page(
        &self,
        cursor: Option<&FeedCursor>,
        fetch: i64,
    ) -> Result<(Vec<Post>, FeedMode)> {
        let ranked_cursor = cursor.and_then(|c| c.as_ranked());

        match post_repo::fetch_ranked_page(&self.pool, ranked_cursor, fetch).await {
            Ok(rows) => Ok((rows, FeedMode::Ranked)),
            Err(FeedQueryError::RankingUnavailable(err)) => {
                warn!("Ranked feed shape unavailable, retrying recency shape: {}", err);
                FEED_FALLBACK_TOTAL.inc();

                let recency_cursor = cursor.and_then(|c| c.as_recency());
                let rows =
                    post_repo::fetch_recency_page(&self.pool, recency_cursor, fetch).await?;
                Ok((rows, FeedMode::Recency))
            }
            Err(FeedQueryError::Database(err)) => Err(err.into()),
        }
    }

    /// Annotate a page with author identity, vendor badge, and engagement
    /// data. The three lookups are independent of each other and of the page
    /// ordering, so they run concurrently; each one is best-effort and
    /// degrades to defaults instead of failing the page.
    pub async fn enrich_posts(&self, rows: Vec<Post>, viewer: Option<Uuid>) -> Vec<FeedPost> {
        if rows.is_empty() {
            return Vec::new();
        }

        let author_ids = distinct(rows.iter().map(|post| post.author_id));
        let post_ids: Vec<Uuid> = rows.iter().map(|post| post.id).collect();

        let (profiles, badges, engagement) = tokio::join!(
            profile_repo::fetch_profiles(&self.pool, &author_ids),
            vendor_repo::fetch_verified_vendor_ids(&self.pool, &author_ids),
            self.fetch_engagement(&post_ids, viewer),
        );

        let profiles: HashMap<Uuid, AuthorProfile> = match profiles {
            Ok(list) => list.into_iter().map(|profile| (profile.id, profile)).collect(),
            Err(err) => {
                warn!("Author identity lookup failed, using placeholders: {}", err);
                HashMap::new()
            }
        };

        let badges: HashSet<Uuid> = match badges {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                warn!("Vendor badge lookup failed, defaulting to unverified: {}", err);
                HashSet::new()
            }
        };

        let engagement = match engagement {
            Ok(engagement) => engagement,
            Err(err) => {
                warn!("Engagement lookup failed, defaulting to zero counts: {}", err);
                Engagement::default()
            }
        };

        rows.into_iter()
            .map(|post| {
                let profile = profiles.get(&post.author_id);
                let author = AuthorSummary {
                    id: post.author_id,
                    display_name: display_name(profile, post.author_id),
                    avatar_url: profile.and_then(|p| p.avatar_url.clone()),
                    verified: badges.contains(&post.author_id),
                };

                FeedPost {
                    id: post.id,
                    author,
                    content: post.content,
                    media: post.media.0,
                    priority_rank: post.priority_rank,
                    is_pinned: post.is_pinned,
                    like_count: engagement.likes.get(&post.id).copied().unwrap_or(0),
                    viewer_has_liked: engagement.liked_by_viewer.contains(&post.id),
                    comment_count: engagement.comments.get(&post.id).copied().unwrap_or(0),
                    created_at: post.created_at,
                    updated_at: post.updated_at,
                }
            })
            .collect()
    }

    /// Enrich a single post (write-path response, single-post reads).
    pub async fn enrich_post(&self, post: Post, viewer: Option<Uuid>) -> FeedPost {
        let mut page = self.enrich_posts(vec![post], viewer).await;
        // One row in, one row out.
        page.remove(0)
    }

    async fn fetch_engagement(
        &self,
        post_ids: &[Uuid],
        viewer: Option<Uuid>,
    ) -> sqlx::Result<Engagement> {
        let likes = engagement_repo::count_likes_batch(&self.pool, post_ids)
            .await?
            .into_iter()
            .collect();
        let comments = engagement_repo::count_comments_batch(&self.pool, post_ids)
            .await?
            .into_iter()
            .collect();
        let liked_by_viewer = match viewer {
            Some(viewer_id) => {
                engagement_repo::liked_post_ids(&self.pool, viewer_id, post_ids)
                    .await?
                    .into_iter()
                    .collect()
            }
            None => HashSet::new(),
        };

        Ok(Engagement {
            likes,
            comments,
            liked_by_viewer,
        })
    }
}

#[derive(Default)]
struct Engagement {
    likes: HashMap<Uuid, i64>,
    comments: HashMap<Uuid, i64>,
    liked_by_viewer: HashSet<Uuid>,
}

/// Display name fallback chain: display name, then username, then a
/// generated placeholder.
fn display_name(profile: Option<&AuthorProfile>, author_id: Uuid) -> String {
    profile
        .and_then(|p| p.display_name.clone())
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            profile
                .and_then(|p| p.username.clone())
                .filter(|name| !name.trim().is_empty())
        })
        .unwrap_or_else(|| placeholder_name(author_id))
}

fn placeholder_name(author_id: Uuid) -> String {
    let hex = author_id.simple().to_string();
    format!("member-{}", &hex[..8])
}

fn distinct(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}
