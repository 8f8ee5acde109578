use serde::Serialize;

use crate::action::{ActionRecord, AutomationStats};

/// In-memory history capacity. Older entries are evicted on overflow.
pub const HISTORY_CAPACITY: usize = 100;

/// Process-wide automation state read by every display component.
///
/// # Invariants
///
/// - `current_action.is_some()` implies `is_running`
/// - `history.len() <= HISTORY_CAPACITY`
/// - `history` is ordered by arrival, most recent first
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SessionState {
    /// True between `action_started` and the matching completion or error.
    pub is_running: bool,
    /// The run in flight, once the backend has described it.
    pub current_action: Option<ActionRecord>,
    pub history: Vec<ActionRecord>,
    /// Last stats snapshot fetched from the backend.
    pub stats: AutomationStats,
    pub is_command_palette_open: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently completed run, if any.
    pub fn latest(&self) -> Option<&ActionRecord> {
        self.history.first()
    }

    /// Checks the structural invariants listed on the type.
    pub fn invariants_hold(&self) -> bool {
        (self.current_action.is_none() || self.is_running)
            && self.history.len() <= HISTORY_CAPACITY
    }
}
