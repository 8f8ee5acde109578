//! Event ingestion state machine.
//!
//! Translates lifecycle events and shortcut notifications into store
//! mutations. One instance exists per live session and it is driven only by
//! the session runtime, so each transition runs to completion before the
//! next event is looked at.
//!
//! At most one run is assumed to be in flight. A second `action_started`
//! while `Running` overwrites the current action, matching the single
//! `current_action` slot of the store.

use nexus_core::event::{AutomationEvent, ShortcutNotification};
use nexus_core::store::AutomationStore;

/// Run phase of the ingestion state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
}

/// Follow-up work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reaction {
    /// A stats refetch must be started.
    pub refresh_stats: bool,
}

#[derive(Debug, Default)]
pub struct EventIngestion {
    phase: RunPhase,
}

impl EventIngestion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Applies one lifecycle event to the store.
    ///
    /// `action_completed` and `error` are accepted in any phase and always
    /// leave the machine `Idle` with no current action.
    pub fn apply(&mut self, event: AutomationEvent, store: &mut AutomationStore) -> Reaction {
        tracing::debug!(
            "[Ingestion] {} received in phase {}",
            event.kind(),
            self.phase
        );

        match event {
            AutomationEvent::ActionStarted(record) => {
                if self.phase == RunPhase::Running {
                    tracing::warn!(
                        "[Ingestion] action_started while a run is in flight, replacing current action"
                    );
                }
                store.set_current_action(Some(record));
                store.set_running(true);
                self.phase = RunPhase::Running;
                Reaction::default()
            }
            AutomationEvent::ActionCompleted(record) => {
                if self.phase == RunPhase::Idle {
                    tracing::debug!("[Ingestion] action_completed without action_started");
                }
                tracing::info!(
                    "[Ingestion] Run completed: id={}, success={}, duration={}ms",
                    record.id,
                    record.success,
                    record.duration_ms
                );
                store.add_to_history(record);
                store.set_current_action(None);
                store.set_running(false);
                self.phase = RunPhase::Idle;
                Reaction {
                    refresh_stats: true,
                }
            }
            AutomationEvent::Error(payload) => {
                tracing::error!("[Ingestion] Automation error: {}", payload);
                store.set_running(false);
                store.set_current_action(None);
                self.phase = RunPhase::Idle;
                Reaction::default()
            }
        }
    }

    /// Applies a shortcut notification. The run phase is not affected.
    pub fn apply_shortcut(&mut self, notification: ShortcutNotification, store: &mut AutomationStore) {
        match notification {
            ShortcutNotification::OpenCommandPalette => {
                tracing::debug!("[Ingestion] Global shortcut: open command palette");
                store.set_command_palette_open(true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::action::ActionRecord;
    use serde_json::json;

    fn started(prompt: &str) -> AutomationEvent {
        AutomationEvent::ActionStarted(ActionRecord::pending(prompt, "2026-10-18T10:00:00Z"))
    }

    fn completed(id: &str) -> AutomationEvent {
        AutomationEvent::ActionCompleted(ActionRecord {
            id: id.to_string(),
            prompt: "Open Chrome".to_string(),
            actions: vec!["Launched application".to_string()],
            success: true,
            duration_ms: 230.0,
            timestamp: "2026-10-18T10:00:01Z".to_string(),
            screenshots: None,
        })
    }

    #[test]
    fn test_started_then_completed() {
        let mut ingestion = EventIngestion::new();
        let mut store = AutomationStore::new();

        let reaction = ingestion.apply(started("Open Chrome"), &mut store);
        assert!(!reaction.refresh_stats);
        assert_eq!(ingestion.phase(), RunPhase::Running);
        assert!(store.state().is_running);
        assert_eq!(
            store.state().current_action.as_ref().map(|a| a.prompt.as_str()),
            Some("Open Chrome")
        );

        let reaction = ingestion.apply(completed("run-1"), &mut store);
        assert!(reaction.refresh_stats);
        assert_eq!(ingestion.phase(), RunPhase::Idle);
        assert!(!store.state().is_running);
        assert!(store.state().current_action.is_none());
        assert_eq!(store.state().history[0].id, "run-1");
        assert!(store.state().invariants_hold());
    }

    #[test]
    fn test_error_without_started_resets() {
        let mut ingestion = EventIngestion::new();
        let mut store = AutomationStore::new();

        let reaction = ingestion.apply(AutomationEvent::Error(json!("boom")), &mut store);
        assert_eq!(reaction, Reaction::default());
        assert_eq!(ingestion.phase(), RunPhase::Idle);
        assert!(!store.state().is_running);
        assert!(store.state().current_action.is_none());
        assert!(store.state().history.is_empty());
    }

    #[test]
    fn test_error_while_running_keeps_history() {
        let mut ingestion = EventIngestion::new();
        let mut store = AutomationStore::new();

        ingestion.apply(started("Click submit"), &mut store);
        ingestion.apply(AutomationEvent::Error(json!({"message": "element not found"})), &mut store);

        assert_eq!(ingestion.phase(), RunPhase::Idle);
        assert!(!store.state().is_running);
        assert!(store.state().current_action.is_none());
        assert!(store.state().history.is_empty());
    }

    #[test]
    fn test_completed_without_started_is_idempotent() {
        let mut ingestion = EventIngestion::new();
        let mut store = AutomationStore::new();

        let reaction = ingestion.apply(completed("late"), &mut store);
        assert!(reaction.refresh_stats);
        assert!(!store.state().is_running);
        assert!(store.state().current_action.is_none());
        assert_eq!(store.state().history.len(), 1);
    }

    #[test]
    fn test_second_start_overwrites_current_action() {
        let mut ingestion = EventIngestion::new();
        let mut store = AutomationStore::new();

        ingestion.apply(started("first"), &mut store);
        ingestion.apply(started("second"), &mut store);

        assert_eq!(ingestion.phase(), RunPhase::Running);
        assert_eq!(
            store.state().current_action.as_ref().map(|a| a.prompt.as_str()),
            Some("second")
        );
    }

    #[test]
    fn test_shortcut_opens_palette_without_phase_change() {
        let mut ingestion = EventIngestion::new();
        let mut store = AutomationStore::new();
        ingestion.apply(started("Search for flights"), &mut store);

        ingestion.apply_shortcut(ShortcutNotification::OpenCommandPalette, &mut store);

        assert!(store.state().is_command_palette_open);
        assert_eq!(ingestion.phase(), RunPhase::Running);
        assert!(store.state().is_running);
    }
}
