//! Application services over the core types.
//!
//! Services own the in-memory state of one session and write it through to
//! the key-value store. Storage failures never abort an operation: they are
//! logged and posted to the shared [`StatusBoard`] as transient notices,
//! and the session keeps working from memory.

pub mod catalog;
pub mod drafts;
pub mod rates;
pub mod settings;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tanuki_core::{KeyValueStore, load_json, save_json};

pub use catalog::{CatalogService, UpdateReport};
pub use drafts::DraftService;
pub use rates::{CurrencyRateResolver, RefreshOutcome};
pub use settings::SettingsService;

/// Severity of a status notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Shared queue of notices, drained by the display layer.
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl StatusBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, notice: Notice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }

    /// Take all pending notices, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Save `value` under `key`, turning a failure into a warning notice.
///
/// Returns whether the write succeeded.
pub(crate) fn persist<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    board: &StatusBoard,
    key: &str,
    value: &T,
) -> bool {
    match save_json(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to persist state");
            board.post(Notice::warning(format!(
                "Could not save changes ({e}); they are kept for this session only"
            )));
            false
        }
    }
}

/// Load `key`, turning a failure into a warning notice and `None`.
pub(crate) fn restore<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    board: &StatusBoard,
    key: &str,
) -> Option<T> {
    match load_json(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to load saved state");
            board.post(Notice::warning(format!("Could not load saved data ({e})")));
            None
        }
    }
}

/// Remove `key`, turning a failure into a warning notice.
pub(crate) fn forget(store: &dyn KeyValueStore, board: &StatusBoard, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "Failed to clear saved state");
        board.post(Notice::warning(format!("Could not clear saved data ({e})")));
    }
}


#[cfg(test)]
mod tests {
    use tanuki_core::MemoryStore;

    use super::test_support::BrokenStore;
    use super::*;

    #[test]
    fn test_board_drains_in_order() {
        let board = StatusBoard::new();
        board.post(Notice::info("one"));
        board.post(Notice::error("two"));

        let drained = board.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "one");
        assert_eq!(drained[1].level, NoticeLevel::Error);
        assert!(board.drain().is_empty());
    }

    #[test]
    fn test_persist_failure_posts_warning() {
        let board = StatusBoard::new();
        assert!(!persist(&BrokenStore, &board, "k", &1));

        let notices = board.drain();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].message.contains("quota exceeded"));
    }

    #[test]
    fn test_persist_and_restore() {
        let board = StatusBoard::new();
        let store = MemoryStore::new();
        assert!(persist(&store, &board, "k", &42));
        assert_eq!(restore::<i32>(&store, &board, "k"), Some(42));
        assert!(board.drain().is_empty());
    }

    #[test]
    fn test_restore_corrupt_posts_warning() {
        let board = StatusBoard::new();
        let store = MemoryStore::new();
        store.save("k", "[1,").ok();
        assert_eq!(restore::<Vec<i32>>(&store, &board, "k"), None);
        assert_eq!(board.drain().len(), 1);
    }
}
