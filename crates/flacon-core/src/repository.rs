use crate::catalog::CatalogEntry;
use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, StorageError>;

/// A stored perfume row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerfumeRecord {
    /// Sequential public identifier, unique and never reused.
    pub public_id: i64,
    /// Human-assigned name, the effective lookup key.
    pub title: String,
}

/// A stored listing row: one seller's offering of a perfume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// The owning perfume's public id.
    pub perfume_id: i64,
    /// Canonical locator for this offering.
    pub link: String,
    /// Token issued by the external shortener; needed to delete the
    /// remote short-link later.
    pub short_id: String,
    /// Hostname derived from `link`; absent when derivation failed.
    pub site: Option<String>,
}

/// Storage contract for the two-table catalogue.
///
/// Implementations must allocate `public_id` atomically: the allocation
/// in [`insert_perfume`](CatalogRepository::insert_perfume) may not be
/// split into a read followed by an insert.
#[async_trait]
pub trait CatalogRepository: Send + Sync + 'static {
    /// Finds a perfume by exact title match.
    /// When several rows share the title, any one of them is returned.
    async fn find_perfume(&self, title: &str) -> Result<Option<PerfumeRecord>>;

    /// Returns every perfume row with the given title.
    ///
    /// Titles are an effective key, not a schema-enforced one: two
    /// concurrent creates of the same new title can both insert. Cascade
    /// deletes must walk all of them.
    async fn perfumes_by_title(&self, title: &str) -> Result<Vec<PerfumeRecord>>;

    /// Inserts a perfume, allocating the next public id
    /// (`max(existing) + 1`, starting at 1).
    async fn insert_perfume(&self, title: &str) -> Result<PerfumeRecord>;

    /// Deletes perfume rows by exact title match.
    /// Returns `true` if any row was removed.
    async fn delete_perfume(&self, title: &str) -> Result<bool>;

    /// Inserts a listing. The referenced perfume must already exist.
    async fn insert_listing(&self, listing: ListingRecord) -> Result<()>;

    /// Finds a listing by exact link match.
    /// Returns `None` if no listing has that link.
    async fn find_listing(&self, link: &str) -> Result<Option<ListingRecord>>;

    /// Returns all listings owned by the given perfume.
    async fn listings_for(&self, perfume_id: i64) -> Result<Vec<ListingRecord>>;

    /// Deletes listing rows by exact link match.
    /// Returns `true` if any row was removed.
    async fn delete_listing(&self, link: &str) -> Result<bool>;

    /// Returns every perfume joined with its listings.
    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>>;

    /// Storage liveness probe.
    async fn ping(&self) -> Result<()>;
}
