use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use flacon_core::catalog::CatalogEntry;
use flacon_core::error::StorageError;
use flacon_core::repository::{CatalogRepository, ListingRecord, PerfumeRecord};

type Result<T> = std::result::Result<T, StorageError>;

/// In-memory implementation of the catalogue repository using DashMap.
///
/// Perfumes are keyed by title (the effective lookup key) and listings
/// by link, each link holding every row inserted for it so duplicate
/// links behave like the relational backend. Public ids come from an
/// atomic counter, so allocation stays race-free without any
/// read-then-insert step. Ids are never reused after deletion, matching
/// the relational backend.
#[derive(Debug)]
pub struct InMemoryCatalog {
    perfumes: DashMap<String, PerfumeRecord>,
    listings: DashMap<String, Vec<ListingRecord>>,
    next_public_id: AtomicI64,
}

impl InMemoryCatalog {
    /// Creates an empty in-memory catalogue.
    pub fn new() -> Self {
        Self {
            perfumes: DashMap::new(),
            listings: DashMap::new(),
            next_public_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn find_perfume(&self, title: &str) -> Result<Option<PerfumeRecord>> {
        Ok(self.perfumes.get(title).map(|entry| entry.clone()))
    }

    async fn perfumes_by_title(&self, title: &str) -> Result<Vec<PerfumeRecord>> {
        // Perfumes are keyed by title here, so at most one row matches.
        Ok(self.perfumes.get(title).map(|entry| entry.clone()).into_iter().collect())
    }

    async fn insert_perfume(&self, title: &str) -> Result<PerfumeRecord> {
        // entry() holds the shard lock, so two concurrent inserts of the
        // same title cannot both allocate an id.
        let record = self
            .perfumes
            .entry(title.to_owned())
            .or_insert_with(|| PerfumeRecord {
                public_id: self.next_public_id.fetch_add(1, Ordering::SeqCst),
                title: title.to_owned(),
            })
            .clone();

        Ok(record)
    }

    async fn delete_perfume(&self, title: &str) -> Result<bool> {
        Ok(self.perfumes.remove(title).is_some())
    }

    async fn insert_listing(&self, listing: ListingRecord) -> Result<()> {
        self.listings
            .entry(listing.link.clone())
            .or_default()
            .push(listing);
        Ok(())
    }

    async fn find_listing(&self, link: &str) -> Result<Option<ListingRecord>> {
        Ok(self
            .listings
            .get(link)
            .and_then(|entry| entry.first().cloned()))
    }

    async fn listings_for(&self, perfume_id: i64) -> Result<Vec<ListingRecord>> {
        let mut matched: Vec<ListingRecord> = self
            .listings
            .iter()
            .flat_map(|entry| entry.value().clone())
            .filter(|listing| listing.perfume_id == perfume_id)
            .collect();

        matched.sort_by(|a, b| a.link.cmp(&b.link));
        Ok(matched)
    }

    async fn delete_listing(&self, link: &str) -> Result<bool> {
        Ok(self.listings.remove(link).is_some())
    }

    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let mut joined: Vec<(i64, CatalogEntry)> = Vec::new();

        for perfume in self.perfumes.iter() {
            for entry in self.listings.iter() {
                for listing in entry.value() {
                    if listing.perfume_id == perfume.public_id {
                        joined.push((
                            perfume.public_id,
                            CatalogEntry {
                                title: perfume.title.clone(),
                                link: listing.link.clone(),
                                short_id: listing.short_id.clone(),
                                site: listing.site.clone(),
                            },
                        ));
                    }
                }
            }
        }

        joined.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.link.cmp(&b.1.link)));
        Ok(joined.into_iter().map(|(_, entry)| entry).collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn public_ids_are_sequential_from_one() {
        let repo = InMemoryCatalog::new();

        let first = repo.insert_perfume("aventus").await.unwrap();
        let second = repo.insert_perfume("green irish tweed").await.unwrap();

        assert_eq!(first.public_id, 1);
        assert_eq!(second.public_id, 2);
    }

    #[tokio::test]
    async fn inserting_an_existing_title_keeps_its_id() {
        let repo = InMemoryCatalog::new();

        let first = repo.insert_perfume("aventus").await.unwrap();
        let again = repo.insert_perfume("aventus").await.unwrap();

        assert_eq!(first.public_id, again.public_id);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let repo = InMemoryCatalog::new();

        repo.insert_perfume("aventus").await.unwrap();
        repo.delete_perfume("aventus").await.unwrap();
        let next = repo.insert_perfume("sauvage").await.unwrap();

        assert_eq!(next.public_id, 2);
    }

    #[tokio::test]
    async fn listings_join_their_perfume() {
        let repo = InMemoryCatalog::new();

        let perfume = repo.insert_perfume("aventus").await.unwrap();
        repo.insert_listing(ListingRecord {
            perfume_id: perfume.public_id,
            link: "https://shop.example/aventus".to_owned(),
            short_id: "s1".to_owned(),
            site: Some("shop.example".to_owned()),
        })
        .await
        .unwrap();

        let catalog = repo.list_catalog().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].title, "aventus");
        assert_eq!(catalog[0].short_id, "s1");
    }

    #[tokio::test]
    async fn duplicate_links_keep_every_row() {
        let repo = InMemoryCatalog::new();

        let perfume = repo.insert_perfume("aventus").await.unwrap();
        for short_id in ["s1", "s2"] {
            repo.insert_listing(ListingRecord {
                perfume_id: perfume.public_id,
                link: "https://shop.example/aventus".to_owned(),
                short_id: short_id.to_owned(),
                site: Some("shop.example".to_owned()),
            })
            .await
            .unwrap();
        }

        assert_eq!(repo.list_catalog().await.unwrap().len(), 2);

        let first = repo
            .find_listing("https://shop.example/aventus")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.short_id, "s1");

        // Deleting by link removes every matching row, like the
        // relational backend's DELETE WHERE link.
        assert!(repo
            .delete_listing("https://shop.example/aventus")
            .await
            .unwrap());
        assert!(repo.list_catalog().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_ids() {
        let repo = std::sync::Arc::new(InMemoryCatalog::new());

        let a = tokio::spawn({
            let repo = repo.clone();
            async move { repo.insert_perfume("left").await.unwrap() }
        });
        let b = tokio::spawn({
            let repo = repo.clone();
            async move { repo.insert_perfume("right").await.unwrap() }
        });

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_ne!(a.public_id, b.public_id);
    }
}
