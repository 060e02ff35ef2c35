use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("public id allocation conflicted: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, Error)]
pub enum ShortLinkError {
    #[error("shortener request failed: {0}")]
    Http(String),
    #[error("shortener returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("shortener response is malformed: {0}")]
    MalformedResponse(String),
    #[error("shortener request timed out: {0}")]
    Timeout(String),
}

/// Errors surfaced by the record reconciliation service.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("no record matches {0}")]
    NotFound(String),
    #[error("short link error: {0}")]
    ShortLinks(#[from] ShortLinkError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
