use crate::error::CatalogError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, CatalogError>;

/// One row of the public catalogue: a perfume joined with one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub link: String,
    pub short_id: String,
    pub site: Option<String>,
}

/// Result of a successful `create_record` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    /// The public id of the perfume the listing was attached to.
    pub public_id: i64,
    /// Whether the perfume itself was created by this call.
    pub perfume_created: bool,
    /// Short id allocated for the new listing.
    pub short_id: String,
}

/// Result of a successful `delete_perfume` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedPerfume {
    /// Number of listings (and remote short-links) removed in the cascade.
    pub listings_removed: usize,
}

/// The record reconciliation service.
///
/// Implementations keep the local catalogue and the external shortener
/// consistent: a committed listing always carries a `short_id` that
/// exists remotely, and a removed listing's short-link is removed too.
#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    /// Attaches a listing for `link` to the perfume named `title`,
    /// creating the perfume first if no row has that title.
    async fn create_record(&self, title: &str, link: &str) -> Result<CreateOutcome>;

    /// Deletes the listing with the given link and its remote short-link.
    async fn delete_listing(&self, link: &str) -> Result<()>;

    /// Deletes a perfume by title, cascading over its listings and their
    /// remote short-links.
    async fn delete_perfume(&self, title: &str) -> Result<DeletedPerfume>;

    /// Returns the full catalogue, unauthenticated and read-only.
    async fn list_all(&self) -> Result<Vec<CatalogEntry>>;

    /// Liveness probe delegated to the storage backend.
    async fn ping(&self) -> Result<()>;
}
