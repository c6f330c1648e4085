/// Database access layer
///
/// Repositories are free async functions over a shared `PgPool`. The posts
/// table is owned by this service; users, vendors, memberships, and the
/// engagement tables are collaborator surfaces it only reads.
pub mod engagement_repo;
pub mod membership_repo;
pub mod post_repo;
pub mod profile_repo;
pub mod vendor_repo;
