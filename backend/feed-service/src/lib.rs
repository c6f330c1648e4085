/// Feed Service Library
///
/// Serves the Bazaar marketplace community feed: priority-ranked post pages
/// with cursor pagination, a recency fallback for when the ranking columns
/// are not queryable yet, and best-effort enrichment with author identity,
/// vendor badges, and engagement counts.
///
/// # Modules
///
/// - `handlers`: Feed and post HTTP request handlers
/// - `models`: Data structures for posts, authors, and responses
/// - `services`: Business logic layer (feed assembly, writes, tiering)
/// - `db`: Database access layer and repositories
/// - `cursor`: Opaque pagination cursor codec
/// - `middleware`: HTTP middleware for authentication
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
