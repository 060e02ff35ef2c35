//! HTTP façade for the Flacon catalogue.
//!
//! Maps the JSON surface onto the record reconciliation service,
//! performing shared-secret authorization and field validation before
//! any service call.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
