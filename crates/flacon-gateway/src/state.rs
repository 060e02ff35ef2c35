use std::sync::Arc;

use flacon_core::catalog::Catalog;

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<dyn Catalog>,
    auth_key: Arc<str>,
    short_endpoint_url: Arc<str>,
    webhook_url: Arc<str>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        auth_key: impl Into<Arc<str>>,
        short_endpoint_url: impl Into<Arc<str>>,
        webhook_url: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            catalog,
            auth_key: auth_key.into(),
            short_endpoint_url: short_endpoint_url.into(),
            webhook_url: webhook_url.into(),
        }
    }

    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Compares a candidate against the configured shared secret.
    pub fn key_matches(&self, candidate: &str) -> bool {
        *self.auth_key == *candidate
    }

    pub fn short_endpoint_url(&self) -> &str {
        &self.short_endpoint_url
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}
