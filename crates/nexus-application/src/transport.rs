//! In-process event transport.
//!
//! Mirrors a desktop shell's named event channels: producers emit raw JSON
//! payloads on `automation-event` or `global-shortcut`, and each listener
//! holds its own broadcast receiver.

use nexus_core::error::{NexusError, Result};
use nexus_core::event::{
    AUTOMATION_EVENT_CHANNEL, AutomationEvent, GLOBAL_SHORTCUT_CHANNEL, ShortcutNotification,
};
use serde_json::Value;
use tokio::sync::broadcast;

const DEFAULT_CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct EventHub {
    automation: broadcast::Sender<Value>,
    shortcut: broadcast::Sender<Value>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        let (automation, _) = broadcast::channel(capacity);
        let (shortcut, _) = broadcast::channel(capacity);
        Self {
            automation,
            shortcut,
        }
    }

    fn sender(&self, channel: &str) -> Result<&broadcast::Sender<Value>> {
        match channel {
            AUTOMATION_EVENT_CHANNEL => Ok(&self.automation),
            GLOBAL_SHORTCUT_CHANNEL => Ok(&self.shortcut),
            other => Err(NexusError::transport(format!("unknown channel '{}'", other))),
        }
    }

    /// Emits a raw payload. Emitting with no listener is not an error.
    pub fn emit(&self, channel: &str, payload: Value) -> Result<()> {
        let sender = self.sender(channel)?;
        if sender.send(payload).is_err() {
            tracing::debug!("[Transport] No listener on '{}', payload dropped", channel);
        }
        Ok(())
    }

    pub fn emit_automation(&self, event: &AutomationEvent) -> Result<()> {
        self.emit(AUTOMATION_EVENT_CHANNEL, event.encode()?)
    }

    pub fn emit_shortcut(&self, notification: ShortcutNotification) -> Result<()> {
        self.emit(GLOBAL_SHORTCUT_CHANNEL, notification.to_payload())
    }

    /// Registers a new listener. Only payloads emitted afterwards are seen.
    pub fn subscribe(&self, channel: &str) -> Result<broadcast::Receiver<Value>> {
        Ok(self.sender(channel)?.subscribe())
    }
}
