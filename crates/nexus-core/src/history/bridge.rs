//! Mirrors the store's history into durable storage.

use std::sync::Arc;

use super::repository::HistoryRepository;
use crate::action::ActionRecord;
use crate::store::HistoryObserver;

/// Number of history entries kept on disk. The in-memory store keeps more.
pub const PERSISTED_HISTORY_LIMIT: usize = 20;

/// Persistence Bridge between the [`AutomationStore`](crate::store::AutomationStore)
/// and a [`HistoryRepository`].
///
/// Registered as the store's [`HistoryObserver`], it writes the most recent
/// [`PERSISTED_HISTORY_LIMIT`] entries after every history change. At startup
/// [`restore`](Self::restore) reads them back. Neither direction ever fails:
/// errors are logged and the bridge degrades to an empty history.
#[derive(Clone)]
pub struct PersistenceBridge {
    repository: Arc<dyn HistoryRepository>,
}

impl PersistenceBridge {
    pub fn new(repository: Arc<dyn HistoryRepository>) -> Self {
        Self { repository }
    }

    /// Reads persisted history once. Corrupt or unreadable data yields an
    /// empty history.
    pub fn restore(&self) -> Vec<ActionRecord> {
        match self.repository.load() {
            Ok(mut records) => {
                records.truncate(PERSISTED_HISTORY_LIMIT);
                tracing::info!("[Persistence] Restored {} history entries", records.len());
                records
            }
            Err(e) => {
                tracing::warn!("[Persistence] Failed to load automation history: {}", e);
                Vec::new()
            }
        }
    }
}

impl HistoryObserver for PersistenceBridge {
    fn history_changed(&self, history: &[ActionRecord]) {
        let slice = &history[..history.len().min(PERSISTED_HISTORY_LIMIT)];
        if let Err(e) = self.repository.save(slice) {
            tracing::warn!("[Persistence] Failed to persist automation history: {}", e);
        }
    }
}
