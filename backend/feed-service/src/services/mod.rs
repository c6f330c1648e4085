/// Business logic layer for feed-service
///
/// - Feed service: page assembly, degradation supervision, enrichment
/// - Post service: validated writes with rank materialized at creation
/// - Tiers: pure tier resolution and the priority function
pub mod feed;
pub mod posts;
pub mod tiers;

// Re-export commonly used services
pub use feed::FeedService;
pub use posts::PostService;
