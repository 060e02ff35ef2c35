//! Core types and traits for the Flacon perfume-link catalogue.
//!
//! This crate provides the shared records and trait seams used by the
//! storage backends, the short-link clients, and the reconciliation
//! service.

pub mod catalog;
pub mod error;
pub mod repository;
pub mod shortlink;
pub mod site;

pub use catalog::{Catalog, CatalogEntry, CreateOutcome, DeletedPerfume};
pub use error::{CatalogError, ShortLinkError, StorageError};
pub use repository::{CatalogRepository, ListingRecord, PerfumeRecord};
pub use shortlink::ShortLinks;
pub use site::extract_domain;
