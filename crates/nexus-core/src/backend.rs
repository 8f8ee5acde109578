//! Interfaces to the automation backend and the host window.
//!
//! The front end never performs device control itself. It hands commands to
//! a [`CommandDispatcher`], reads aggregates from a [`StatsProvider`], and
//! learns about progress only through lifecycle events.

use async_trait::async_trait;

use crate::action::{ActionRecord, AutomationStats};
use crate::error::Result;

/// Default number of records returned by [`HistoryProvider::recent_actions`].
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Executes natural-language commands.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Runs `prompt` to completion.
    ///
    /// Progress is reported through lifecycle events; the returned value only
    /// says whether the backend accepted and finished the call.
    ///
    /// # Errors
    ///
    /// - `NexusError::InvalidCommand` if `prompt` is blank after trimming
    /// - `NexusError::Transport` if the call could not be delivered
    async fn execute(&self, prompt: &str) -> Result<()>;
}

/// Source of aggregate statistics.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    async fn fetch_stats(&self) -> Result<AutomationStats>;
}

/// Backend-side history, independent of the front end's copy.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Returns up to `limit` records, most recent first.
    async fn recent_actions(&self, limit: usize) -> Result<Vec<ActionRecord>>;

    /// Drops the backend history and resets its statistics.
    async fn clear_history(&self) -> Result<()>;
}

/// Binds a global accelerator to "open the command palette".
///
/// Registration is best effort: callers log failures and continue.
#[async_trait]
pub trait ShortcutRegistrar: Send + Sync {
    async fn register(&self, accelerator: &str) -> Result<()>;

    async fn unregister_all(&self) -> Result<()>;
}

/// Host window chrome. All calls are fire-and-forget from the core's view.
#[async_trait]
pub trait WindowControls: Send + Sync {
    async fn minimize(&self) -> Result<()>;

    /// Maximizes, or restores if already maximized. Returns the new state.
    async fn toggle_maximize(&self) -> Result<bool>;

    async fn close(&self) -> Result<()>;

    /// Returns the new always-on-top state.
    async fn toggle_always_on_top(&self) -> Result<bool>;
}
