//! The record reconciliation service for the Flacon catalogue.
//!
//! `CatalogService` is the one place that combines repository reads,
//! conditional branching, external short-link calls, and repository
//! writes, and it owns the ordering rules that keep the local catalogue
//! consistent with the remote shortener.

pub mod service;

pub use flacon_core::catalog::Catalog;
pub use service::CatalogService;
