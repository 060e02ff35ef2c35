use async_trait::async_trait;
use flacon_core::catalog::CatalogEntry;
use flacon_core::error::StorageError;
use flacon_core::repository::{CatalogRepository, ListingRecord, PerfumeRecord};
use jiff::Timestamp;
use sqlx::{PgPool, Row};

type Result<T> = std::result::Result<T, StorageError>;

/// How often the atomic public-id allocation is retried when concurrent
/// creates collide on the unique constraint. Every round at least one
/// contender commits, so this bound must only exceed the number of
/// creates landing in the same instant.
const ALLOC_ATTEMPTS: u32 = 16;

/// PostgreSQL implementation of the catalogue repository.
///
/// Public ids are allocated inside a single `INSERT ... SELECT
/// COALESCE(MAX(public_id), 0) + 1` statement guarded by a unique
/// constraint, retried on conflict. The allocation is never split into
/// a separate read and insert.
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Creates a repository from an existing Postgres connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new Postgres connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn now_unix_seconds() -> i64 {
    Timestamp::now().as_second()
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

fn listing_from_row(row: &sqlx::postgres::PgRow) -> Result<ListingRecord> {
    Ok(ListingRecord {
        perfume_id: row.try_get("perfume_id").map_err(map_sqlx_error)?,
        link: row.try_get("link").map_err(map_sqlx_error)?,
        short_id: row.try_get("short_id").map_err(map_sqlx_error)?,
        site: row.try_get("site").map_err(map_sqlx_error)?,
    })
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn find_perfume(&self, title: &str) -> Result<Option<PerfumeRecord>> {
        let row = sqlx::query(
            r#"
            SELECT public_id, title
            FROM perfume
            WHERE title = $1
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(PerfumeRecord {
            public_id: row.try_get("public_id").map_err(map_sqlx_error)?,
            title: row.try_get("title").map_err(map_sqlx_error)?,
        }))
    }

    async fn perfumes_by_title(&self, title: &str) -> Result<Vec<PerfumeRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT public_id, title
            FROM perfume
            WHERE title = $1
            ORDER BY public_id
            "#,
        )
        .bind(title)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(PerfumeRecord {
                    public_id: row.try_get("public_id").map_err(map_sqlx_error)?,
                    title: row.try_get("title").map_err(map_sqlx_error)?,
                })
            })
            .collect()
    }

    async fn insert_perfume(&self, title: &str) -> Result<PerfumeRecord> {
        let mut last_conflict = None;

        for _ in 0..ALLOC_ATTEMPTS {
            let result = sqlx::query(
                r#"
                INSERT INTO perfume (title, public_id, created_at)
                SELECT $1, COALESCE(MAX(public_id), 0) + 1, $2 FROM perfume
                RETURNING public_id
                "#,
            )
            .bind(title)
            .bind(now_unix_seconds())
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(row) => {
                    return Ok(PerfumeRecord {
                        public_id: row.try_get("public_id").map_err(map_sqlx_error)?,
                        title: title.to_owned(),
                    });
                }
                Err(err) if is_unique_violation(&err) => {
                    last_conflict = Some(err);
                }
                Err(err) => return Err(map_sqlx_error(err)),
            }
        }

        Err(StorageError::Conflict(
            last_conflict.map_or_else(String::new, |e| e.to_string()),
        ))
    }

    async fn delete_perfume(&self, title: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM perfume
            WHERE title = $1
            "#,
        )
        .bind(title)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_listing(&self, listing: ListingRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO perfume_listing (perfume_id, link, short_id, site, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(listing.perfume_id)
        .bind(listing.link)
        .bind(listing.short_id)
        .bind(listing.site)
        .bind(now_unix_seconds())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_listing(&self, link: &str) -> Result<Option<ListingRecord>> {
        let row = sqlx::query(
            r#"
            SELECT perfume_id, link, short_id, site
            FROM perfume_listing
            WHERE link = $1
            LIMIT 1
            "#,
        )
        .bind(link)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(listing_from_row).transpose()
    }

    async fn listings_for(&self, perfume_id: i64) -> Result<Vec<ListingRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT perfume_id, link, short_id, site
            FROM perfume_listing
            WHERE perfume_id = $1
            ORDER BY id
            "#,
        )
        .bind(perfume_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(listing_from_row).collect()
    }

    async fn delete_listing(&self, link: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM perfume_listing
            WHERE link = $1
            "#,
        )
        .bind(link)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_catalog(&self) -> Result<Vec<CatalogEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT p.title, l.link, l.short_id, l.site
            FROM perfume p
            JOIN perfume_listing l ON l.perfume_id = p.public_id
            ORDER BY p.public_id, l.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(CatalogEntry {
                    title: row.try_get("title").map_err(map_sqlx_error)?,
                    link: row.try_get("link").map_err(map_sqlx_error)?,
                    short_id: row.try_get("short_id").map_err(map_sqlx_error)?,
                    site: row.try_get("site").map_err(map_sqlx_error)?,
                })
            })
            .collect()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
