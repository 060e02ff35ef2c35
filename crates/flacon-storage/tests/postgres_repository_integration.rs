use std::time::Duration;

use flacon_core::repository::{CatalogRepository, ListingRecord};
use flacon_storage::PgCatalogRepository;
use flacon_test_infra::postgres::{PostgresConfig, PostgresServer};
use sqlx::postgres::PgPoolOptions;

struct Fixture {
    _postgres: PostgresServer,
    repo: PgCatalogRepository,
}

impl Fixture {
    async fn start() -> Self {
        let postgres = PostgresServer::new(PostgresConfig::builder().build())
            .await
            .expect("start postgres");
        let url = postgres.database_url().await.expect("postgres url");
        let pool = connect_with_retry(&url).await;

        sqlx::raw_sql(include_str!("../ddl/postgres/catalog.sql"))
            .execute(&pool)
            .await
            .expect("create schema");

        Self {
            _postgres: postgres,
            repo: PgCatalogRepository::new(pool),
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::PgPool {
    let mut last_error = None;

    for _ in 0..20 {
        match PgPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect postgres: {last_error:?}");
}

fn listing(perfume_id: i64, link: &str, short_id: &str) -> ListingRecord {
    ListingRecord {
        perfume_id,
        link: link.to_owned(),
        short_id: short_id.to_owned(),
        site: Some("shop.example".to_owned()),
    }
}

#[tokio::test]
async fn insert_perfume_allocates_sequential_public_ids() {
    let fixture = Fixture::start().await;

    let first = fixture.repo.insert_perfume("aventus").await.unwrap();
    let second = fixture.repo.insert_perfume("sauvage").await.unwrap();

    assert_eq!(first.public_id, 1);
    assert_eq!(second.public_id, 2);
}

#[tokio::test]
async fn find_perfume_by_title() {
    let fixture = Fixture::start().await;

    let inserted = fixture.repo.insert_perfume("aventus").await.unwrap();
    let found = fixture.repo.find_perfume("aventus").await.unwrap().unwrap();

    assert_eq!(found, inserted);
    assert!(fixture.repo.find_perfume("unknown").await.unwrap().is_none());
}

#[tokio::test]
async fn listings_round_trip_and_join() {
    let fixture = Fixture::start().await;

    let perfume = fixture.repo.insert_perfume("aventus").await.unwrap();
    fixture
        .repo
        .insert_listing(listing(
            perfume.public_id,
            "https://shop.example/aventus",
            "abc",
        ))
        .await
        .unwrap();

    let found = fixture
        .repo
        .find_listing("https://shop.example/aventus")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.short_id, "abc");
    assert_eq!(found.perfume_id, perfume.public_id);

    let catalog = fixture.repo.list_catalog().await.unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].title, "aventus");
    assert_eq!(catalog[0].site.as_deref(), Some("shop.example"));
}

#[tokio::test]
async fn delete_listing_by_link() {
    let fixture = Fixture::start().await;

    let perfume = fixture.repo.insert_perfume("aventus").await.unwrap();
    fixture
        .repo
        .insert_listing(listing(
            perfume.public_id,
            "https://shop.example/aventus",
            "abc",
        ))
        .await
        .unwrap();

    assert!(fixture
        .repo
        .delete_listing("https://shop.example/aventus")
        .await
        .unwrap());
    assert!(!fixture.repo.delete_listing("https://nope").await.unwrap());
    assert!(fixture
        .repo
        .find_listing("https://shop.example/aventus")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_titles_cascade_without_tripping_the_foreign_key() {
    let fixture = Fixture::start().await;

    // Two rows sharing a title, as left behind by two concurrent creates
    // of the same new title.
    let first = fixture.repo.insert_perfume("aventus").await.unwrap();
    let second = fixture.repo.insert_perfume("aventus").await.unwrap();
    assert_ne!(first.public_id, second.public_id);

    fixture
        .repo
        .insert_listing(listing(first.public_id, "https://a.example/1", "s1"))
        .await
        .unwrap();
    fixture
        .repo
        .insert_listing(listing(second.public_id, "https://b.example/2", "s2"))
        .await
        .unwrap();

    let matched = fixture.repo.perfumes_by_title("aventus").await.unwrap();
    assert_eq!(matched.len(), 2);

    for perfume in &matched {
        for row in fixture.repo.listings_for(perfume.public_id).await.unwrap() {
            fixture.repo.delete_listing(&row.link).await.unwrap();
        }
    }

    assert!(fixture.repo.delete_perfume("aventus").await.unwrap());
    assert!(fixture.repo.find_perfume("aventus").await.unwrap().is_none());
    assert!(fixture
        .repo
        .perfumes_by_title("aventus")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn concurrent_inserts_never_share_a_public_id() {
    let fixture = Fixture::start().await;
    let repo = fixture.repo.clone();

    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.insert_perfume(&format!("perfume-{i}")).await.unwrap()
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().public_id);
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 8, "public ids must be unique under contention");
}

#[tokio::test]
async fn ping_succeeds() {
    let fixture = Fixture::start().await;
    fixture.repo.ping().await.unwrap();
}
