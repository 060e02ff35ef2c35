pub mod memory;
pub mod postgres;

pub use flacon_core::repository::CatalogRepository;
pub use flacon_core::StorageError;
pub use memory::InMemoryCatalog;
pub use postgres::PgCatalogRepository;
