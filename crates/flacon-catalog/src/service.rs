use std::sync::Arc;

use async_trait::async_trait;
use flacon_core::catalog::{Catalog, CatalogEntry, CreateOutcome, DeletedPerfume};
use flacon_core::error::CatalogError;
use flacon_core::repository::{CatalogRepository, ListingRecord};
use flacon_core::shortlink::ShortLinks;
use flacon_core::site::extract_domain;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, CatalogError>;

/// A concrete implementation of the `Catalog` trait.
///
/// Ordering rules:
/// - On create, the remote short-link is created *before* the listing
///   row, so a committed listing always carries a live short id. If the
///   row insert then fails, the short-link is deleted again.
/// - On delete, the remote short-link goes first; the row is only
///   removed once the remote side has let go, so a stored short id
///   never points at nothing.
#[derive(Debug, Clone)]
pub struct CatalogService<R, S> {
    repository: Arc<R>,
    short_links: Arc<S>,
}

impl<R: CatalogRepository, S: ShortLinks> CatalogService<R, S> {
    /// Creates a new `CatalogService` over the given collaborators.
    pub fn new(repository: Arc<R>, short_links: Arc<S>) -> Self {
        Self {
            repository,
            short_links,
        }
    }
}

#[async_trait]
impl<R: CatalogRepository, S: ShortLinks> Catalog for CatalogService<R, S> {
    async fn create_record(&self, title: &str, link: &str) -> Result<CreateOutcome> {
        let existing = self.repository.find_perfume(title).await?;
        let (perfume, perfume_created) = match existing {
            Some(perfume) => (perfume, false),
            None => (self.repository.insert_perfume(title).await?, true),
        };

        // A failed remote call aborts the operation here, leaving at most
        // a bare perfume row behind. That row holds no short id and is
        // reused by the next attempt for the same title.
        let short_id = self.short_links.create(link).await?;

        let listing = ListingRecord {
            perfume_id: perfume.public_id,
            link: link.to_owned(),
            short_id: short_id.clone(),
            site: extract_domain(link),
        };

        if let Err(err) = self.repository.insert_listing(listing).await {
            if let Err(cleanup) = self.short_links.delete(&short_id).await {
                warn!(
                    short_id = %short_id,
                    error = %cleanup,
                    "failed to remove short link after aborted listing insert"
                );
            }
            return Err(err.into());
        }

        info!(
            title = %title,
            link = %link,
            public_id = perfume.public_id,
            perfume_created,
            "created listing"
        );

        Ok(CreateOutcome {
            public_id: perfume.public_id,
            perfume_created,
            short_id,
        })
    }

    async fn delete_listing(&self, link: &str) -> Result<()> {
        let listing = self
            .repository
            .find_listing(link)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("listing with link '{link}'")))?;

        self.short_links.delete(&listing.short_id).await?;
        self.repository.delete_listing(link).await?;

        info!(link = %link, short_id = %listing.short_id, "deleted listing");
        Ok(())
    }

    async fn delete_perfume(&self, title: &str) -> Result<DeletedPerfume> {
        // Titles are not schema-unique, so the cascade walks every row
        // with this title; deleting only the first row's listings would
        // trip the foreign key on the bulk perfume delete below.
        let perfumes = self.repository.perfumes_by_title(title).await?;
        if perfumes.is_empty() {
            return Err(CatalogError::NotFound(format!("perfume titled '{title}'")));
        }

        // Each listing's row is removed right after its remote deletion
        // succeeds, so a failure mid-cascade leaves no row whose short id
        // has already been revoked.
        let mut listings_removed = 0;
        for perfume in &perfumes {
            let listings = self.repository.listings_for(perfume.public_id).await?;
            for listing in &listings {
                self.short_links.delete(&listing.short_id).await?;
                self.repository.delete_listing(&listing.link).await?;
                listings_removed += 1;
            }
        }

        self.repository.delete_perfume(title).await?;

        info!(title = %title, listings_removed, "deleted perfume");
        Ok(DeletedPerfume { listings_removed })
    }

    async fn list_all(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self.repository.list_catalog().await?)
    }

    async fn ping(&self) -> Result<()> {
        Ok(self.repository.ping().await?)
    }
}
