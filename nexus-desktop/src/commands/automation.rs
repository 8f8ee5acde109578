//! Automation commands issued by the front end.

use tokio::task::JoinHandle;

use crate::app::AppState;

/// Sends a palette command to the backend. Blank commands are rejected.
pub fn execute_automation(state: &AppState, prompt: &str) -> Result<(), String> {
    state
        .commands
        .dispatch(prompt)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Clears backend and local history, then refreshes stats.
pub fn clear_automation_history(state: &AppState) -> JoinHandle<()> {
    state.commands.clear_history()
}
