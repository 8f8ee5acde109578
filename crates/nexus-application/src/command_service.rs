//! Command dispatch and stats refresh use cases.

use std::sync::Arc;

use nexus_core::backend::{CommandDispatcher, HistoryProvider, StatsProvider};
use nexus_core::error::{NexusError, Result};
use nexus_core::event::AutomationEvent;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::runtime::SessionHandle;

/// Fetches stats in the background and feeds the result back to the session.
///
/// Failures are logged and the session keeps its previous stats.
pub(crate) fn spawn_stats_refresh(
    stats: Arc<dyn StatsProvider>,
    session: SessionHandle,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match stats.fetch_stats().await {
            Ok(fresh) => {
                tracing::debug!(
                    "[Stats] Refreshed: total={}, success_rate={:.1}",
                    fresh.total_actions,
                    fresh.success_rate
                );
                if let Err(e) = session.update_stats(fresh) {
                    tracing::debug!("[Stats] Dropping refreshed stats: {}", e);
                }
            }
            Err(e) => tracing::error!("[Stats] Failed to fetch stats: {}", e),
        }
    })
}

/// Front-end entry point for commands that leave the process.
///
/// Every call is fire-and-forget: the returned handle may be awaited by
/// tests, the UI never does.
#[derive(Clone)]
pub struct CommandService {
    dispatcher: Arc<dyn CommandDispatcher>,
    stats: Arc<dyn StatsProvider>,
    history: Option<Arc<dyn HistoryProvider>>,
    session: SessionHandle,
}

impl CommandService {
    pub fn new(
        dispatcher: Arc<dyn CommandDispatcher>,
        stats: Arc<dyn StatsProvider>,
        session: SessionHandle,
    ) -> Self {
        Self {
            dispatcher,
            stats,
            history: None,
            session,
        }
    }

    /// Backend history to clear alongside the local one.
    pub fn with_history_provider(mut self, history: Arc<dyn HistoryProvider>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Sends `command` to the backend.
    ///
    /// Blank commands are rejected before anything is spawned. A failed
    /// dispatch is logged and the session is reset to idle.
    pub fn dispatch(&self, command: &str) -> Result<JoinHandle<()>> {
        let command = command.trim();
        if command.is_empty() {
            return Err(NexusError::InvalidCommand(
                "command is empty after trimming".to_string(),
            ));
        }

        tracing::info!("[Command] Dispatching: {}", command);
        let dispatcher = self.dispatcher.clone();
        let session = self.session.clone();
        let command = command.to_string();

        Ok(tokio::spawn(async move {
            if let Err(e) = dispatcher.execute(&command).await {
                tracing::error!("[Command] Failed to execute '{}': {}", command, e);
                let reset = AutomationEvent::Error(json!({
                    "prompt": command,
                    "message": e.to_string(),
                }));
                if let Err(e) = session.ingest(reset) {
                    tracing::debug!("[Command] Session gone, cannot reset: {}", e);
                }
            }
        }))
    }

    /// Starts a fire-and-forget stats fetch.
    pub fn refresh_stats(&self) -> JoinHandle<()> {
        spawn_stats_refresh(self.stats.clone(), self.session.clone())
    }

    /// Clears the backend history (when available) and the local one, then
    /// refreshes stats.
    pub fn clear_history(&self) -> JoinHandle<()> {
        let history = self.history.clone();
        let session = self.session.clone();
        let stats = self.stats.clone();

        tokio::spawn(async move {
            if let Some(history) = history {
                if let Err(e) = history.clear_history().await {
                    tracing::error!("[Command] Failed to clear backend history: {}", e);
                }
            }
            if let Err(e) = session.clear_history() {
                tracing::debug!("[Command] Session gone, cannot clear history: {}", e);
                return;
            }
            let _ = spawn_stats_refresh(stats, session).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SessionRuntime;
    use async_trait::async_trait;
    use nexus_core::action::{ActionRecord, AutomationStats};
    use nexus_core::store::AutomationStore;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDispatcher {
        commands: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl CommandDispatcher for RecordingDispatcher {
        async fn execute(&self, prompt: &str) -> Result<()> {
            self.commands.lock().unwrap().push(prompt.to_string());
            if self.fail {
                Err(NexusError::transport("connection refused"))
            } else {
                Ok(())
            }
        }
    }

    struct FixedStats(AutomationStats);

    #[async_trait]
    impl StatsProvider for FixedStats {
        async fn fetch_stats(&self) -> Result<AutomationStats> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingHistory {
        cleared: Mutex<usize>,
    }

    #[async_trait]
    impl HistoryProvider for RecordingHistory {
        async fn recent_actions(&self, _limit: usize) -> Result<Vec<ActionRecord>> {
            Ok(Vec::new())
        }

        async fn clear_history(&self) -> Result<()> {
            *self.cleared.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn stats(total: u64) -> AutomationStats {
        AutomationStats {
            total_actions: total,
            ..AutomationStats::default()
        }
    }

    #[tokio::test]
    async fn test_dispatch_trims_command() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let (runtime, handle) = SessionRuntime::new(AutomationStore::new());
        let task = runtime.spawn();
        let service = CommandService::new(dispatcher.clone(), Arc::new(FixedStats(stats(0))), handle.clone());

        service.dispatch("  Open Chrome  ").unwrap().await.unwrap();

        assert_eq!(*dispatcher.commands.lock().unwrap(), vec!["Open Chrome".to_string()]);
        handle.shutdown().unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_dispatch_rejects_blank_command() {
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let (_runtime, handle) = SessionRuntime::new(AutomationStore::new());
        let service = CommandService::new(dispatcher.clone(), Arc::new(FixedStats(stats(0))), handle);

        let err = service.dispatch("   ").unwrap_err();
        assert!(matches!(err, NexusError::InvalidCommand(_)));
        assert!(dispatcher.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_dispatch_resets_session() {
        let dispatcher = Arc::new(RecordingDispatcher {
            fail: true,
            ..RecordingDispatcher::default()
        });
        let (runtime, handle) = SessionRuntime::new(AutomationStore::new());
        let task = runtime.spawn();
        let service = CommandService::new(dispatcher, Arc::new(FixedStats(stats(0))), handle.clone());

        handle
            .ingest(AutomationEvent::ActionStarted(ActionRecord::pending(
                "Close window",
                "2026-10-18T10:00:00Z",
            )))
            .unwrap();
        service.dispatch("Close window").unwrap().await.unwrap();
        handle.shutdown().unwrap();

        let store = task.await.unwrap();
        assert!(!store.state().is_running);
        assert!(store.state().current_action.is_none());
    }

    #[tokio::test]
    async fn test_refresh_stats_updates_session() {
        let (runtime, handle) = SessionRuntime::new(AutomationStore::new());
        let task = runtime.spawn();
        let service = CommandService::new(
            Arc::new(RecordingDispatcher::default()),
            Arc::new(FixedStats(stats(42))),
            handle.clone(),
        );

        service.refresh_stats().await.unwrap();
        handle.shutdown().unwrap();

        let store = task.await.unwrap();
        assert_eq!(store.state().stats.total_actions, 42);
    }

    #[tokio::test]
    async fn test_clear_history_clears_both_sides() {
        let history = Arc::new(RecordingHistory::default());
        let seeded = AutomationStore::new().with_history(vec![ActionRecord::pending("Scroll down", "")]);
        let (runtime, handle) = SessionRuntime::new(seeded);
        let task = runtime.spawn();
        let service = CommandService::new(
            Arc::new(RecordingDispatcher::default()),
            Arc::new(FixedStats(stats(0))),
            handle.clone(),
        )
        .with_history_provider(history.clone());

        service.clear_history().await.unwrap();
        handle.shutdown().unwrap();

        let store = task.await.unwrap();
        assert!(store.state().history.is_empty());
        assert_eq!(*history.cleared.lock().unwrap(), 1);
    }
}
