use crate::error::ShortLinkError;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortLinkError>;

/// Client contract for the external URL-shortener service.
///
/// The returned short id is a capability: it is the only handle the
/// catalogue holds for deleting the remote short-link later.
#[async_trait]
pub trait ShortLinks: Send + Sync + 'static {
    /// Creates a remote short-link for `url` and returns its short id.
    async fn create(&self, url: &str) -> Result<String>;

    /// Deletes the remote short-link identified by `short_id`.
    async fn delete(&self, short_id: &str) -> Result<()>;
}
