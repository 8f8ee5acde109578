use std::fmt;
use std::sync::Arc;

use super::state::{HISTORY_CAPACITY, SessionState};
use crate::action::{ActionRecord, AutomationStats};

/// Hook invoked by the store after every change to `history`.
///
/// Implementations must not panic; failures are theirs to log.
pub trait HistoryObserver: Send + Sync {
    fn history_changed(&self, history: &[ActionRecord]);
}

/// Owner of the single [`SessionState`] record.
///
/// All mutations go through the methods below, none of which can fail.
/// `add_to_history` and `clear_history` notify the registered
/// [`HistoryObserver`] once the new history is in place.
#[derive(Default)]
pub struct AutomationStore {
    state: SessionState,
    observer: Option<Arc<dyn HistoryObserver>>,
}

impl fmt::Debug for AutomationStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomationStore")
            .field("state", &self.state)
            .field("has_observer", &self.observer.is_some())
            .finish()
    }
}

impl AutomationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds history from persisted records (most recent first) without
    /// notifying the observer. Anything past the capacity is dropped.
    pub fn with_history(mut self, mut history: Vec<ActionRecord>) -> Self {
        history.truncate(HISTORY_CAPACITY);
        self.state.history = history;
        self
    }

    /// Registers the post-mutation history hook.
    pub fn with_observer(mut self, observer: Arc<dyn HistoryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub fn set_running(&mut self, running: bool) {
        self.state.is_running = running;
    }

    pub fn set_current_action(&mut self, action: Option<ActionRecord>) {
        self.state.current_action = action;
    }

    pub fn update_stats(&mut self, stats: AutomationStats) {
        self.state.stats = stats;
    }

    pub fn set_command_palette_open(&mut self, open: bool) {
        self.state.is_command_palette_open = open;
    }

    /// Prepends a completed run, evicting the oldest entries past capacity.
    pub fn add_to_history(&mut self, record: ActionRecord) {
        self.state.history.insert(0, record);
        self.state.history.truncate(HISTORY_CAPACITY);
        self.notify_history_changed();
    }

    pub fn clear_history(&mut self) {
        self.state.history.clear();
        self.notify_history_changed();
    }

    fn notify_history_changed(&self) {
        if let Some(observer) = &self.observer {
            observer.history_changed(&self.state.history);
        }
    }
}
