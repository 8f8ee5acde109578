//! File-backed history repository.
//!
//! Stores the persisted slice of automation history as a JSON array of
//! `ActionRecord` values in the `automation-history` slot.

use nexus_core::action::ActionRecord;
use nexus_core::error::Result;
use nexus_core::history::HistoryRepository;

use crate::paths::NexusPaths;
use crate::storage::SlotStore;

/// Slot key holding the persisted history.
pub const HISTORY_SLOT_KEY: &str = "automation-history";

pub struct FileHistoryRepository {
    slots: SlotStore,
}

impl FileHistoryRepository {
    /// Creates a repository in the default slot directory.
    pub fn new(paths: &NexusPaths) -> Result<Self> {
        let dir = paths
            .slot_dir()
            .map_err(|e| nexus_core::NexusError::config(e.to_string()))?;
        Ok(Self::with_slot_store(SlotStore::new(dir)))
    }

    /// Creates a repository over an existing slot store (for testing or
    /// a configured directory).
    pub fn with_slot_store(slots: SlotStore) -> Self {
        Self { slots }
    }
}

impl HistoryRepository for FileHistoryRepository {
    fn load(&self) -> Result<Vec<ActionRecord>> {
        match self.slots.get(HISTORY_SLOT_KEY)? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, records: &[ActionRecord]) -> Result<()> {
        let content = serde_json::to_string(records)?;
        self.slots.set(HISTORY_SLOT_KEY, &content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::history::{PERSISTED_HISTORY_LIMIT, PersistenceBridge};
    use nexus_core::store::AutomationStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn record(n: usize) -> ActionRecord {
        ActionRecord {
            id: format!("action-{}", n),
            prompt: format!("Command {}", n),
            actions: vec!["Analyzed screen".to_string(), "Executed action".to_string()],
            success: n % 3 != 0,
            duration_ms: 150.0 + n as f64,
            timestamp: format!("2026-10-18T09:{:02}:00+00:00", n),
            screenshots: if n % 2 == 0 {
                Some(vec![format!("shot-{}", n)])
            } else {
                None
            },
        }
    }

    fn repository(temp_dir: &TempDir) -> FileHistoryRepository {
        FileHistoryRepository::with_slot_store(SlotStore::new(temp_dir.path().to_path_buf()))
    }

    #[test]
    fn test_empty_slot_loads_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        assert!(repository(&temp_dir).load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip_through_store() {
        let temp_dir = TempDir::new().unwrap();
        let bridge = Arc::new(PersistenceBridge::new(Arc::new(repository(&temp_dir))));
        let mut store = AutomationStore::new().with_observer(bridge);
        for n in 0..25 {
            store.add_to_history(record(n));
        }

        // simulate a restart with a fresh repository over the same directory
        let restarted = PersistenceBridge::new(Arc::new(repository(&temp_dir)));
        let restored = restarted.restore();

        assert_eq!(restored.len(), PERSISTED_HISTORY_LIMIT);
        assert_eq!(restored, store.state().history[..PERSISTED_HISTORY_LIMIT].to_vec());
        assert_eq!(restored[0].id, "action-24");
        assert_eq!(restored[19].id, "action-5");
    }

    #[test]
    fn test_corrupt_slot_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let slots = SlotStore::new(temp_dir.path().to_path_buf());
        slots.set(HISTORY_SLOT_KEY, r#"{"not": "an array"}"#).unwrap();

        let repository = FileHistoryRepository::with_slot_store(slots);
        let err = repository.load().unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_corrupt_slot_restores_empty_history() {
        let temp_dir = TempDir::new().unwrap();
        let slots = SlotStore::new(temp_dir.path().to_path_buf());
        slots.set(HISTORY_SLOT_KEY, "[{\"id\": 1").unwrap();

        let bridge = PersistenceBridge::new(Arc::new(FileHistoryRepository::with_slot_store(slots)));
        assert!(bridge.restore().is_empty());
    }
}
