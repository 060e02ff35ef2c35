use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use flacon_core::error::ShortLinkError;
use flacon_core::shortlink::ShortLinks;

type Result<T> = std::result::Result<T, ShortLinkError>;

/// In-memory stand-in for the remote shortener.
///
/// Hands out sequential short ids ("sl000", "sl001", ...) and records
/// every create and delete, so tests can assert exactly which remote
/// calls a flow issued. Either operation can be switched to fail to
/// exercise the consistency paths.
#[derive(Debug, Default)]
pub struct RecordingShortLinks {
    counter: AtomicU64,
    created: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
}

impl RecordingShortLinks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create` call fail.
    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent `delete` call fail.
    pub fn fail_deletes(&self) {
        self.fail_delete.store(true, Ordering::SeqCst);
    }

    /// URLs passed to `create`, in call order.
    pub fn created(&self) -> Vec<String> {
        self.created.lock().expect("lock poisoned").clone()
    }

    /// Short ids passed to `delete`, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ShortLinks for RecordingShortLinks {
    async fn create(&self, url: &str) -> Result<String> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(ShortLinkError::Status {
                status: 503,
                body: "shortener down".to_owned(),
            });
        }

        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let short_id = format!("sl{count:03}");
        self.created
            .lock()
            .expect("lock poisoned")
            .push(url.to_owned());
        Ok(short_id)
    }

    async fn delete(&self, short_id: &str) -> Result<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(ShortLinkError::Status {
                status: 503,
                body: "shortener down".to_owned(),
            });
        }

        self.deleted
            .lock()
            .expect("lock poisoned")
            .push(short_id.to_owned());
        Ok(())
    }
}
