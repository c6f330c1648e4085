/// HTTP handlers for feed-service endpoints
///
/// - Feed: the priority-ranked community feed with cursor pagination
/// - Posts: create, read, delete, and pin posts
pub mod feed;
pub mod posts;

// Re-export handler functions at module level
pub use feed::get_feed;
pub use posts::{create_post, delete_post, get_post, set_pinned};
