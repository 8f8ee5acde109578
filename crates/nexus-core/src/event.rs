//! Events pushed from the backend to the front end.
//!
//! Two channels exist: `automation-event` carries run lifecycle events and
//! `global-shortcut` carries shortcut notifications. Payloads travel as JSON
//! and are decoded into the closed enums below at the transport boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::action::ActionRecord;
use crate::error::Result;

/// Channel name for run lifecycle events.
pub const AUTOMATION_EVENT_CHANNEL: &str = "automation-event";

/// Channel name for global shortcut notifications.
pub const GLOBAL_SHORTCUT_CHANNEL: &str = "global-shortcut";

/// Payload sent on [`GLOBAL_SHORTCUT_CHANNEL`] to request the command palette.
pub const COMMAND_PALETTE_PAYLOAD: &str = "command-palette";

/// Lifecycle event for a single automation run.
///
/// Wire format: `{"type": "action_started", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum AutomationEvent {
    /// A run began; the payload is the in-progress record.
    ActionStarted(ActionRecord),
    /// A run finished (successfully or not) and produced a full record.
    ActionCompleted(ActionRecord),
    /// The backend failed the run. The payload is opaque.
    Error(Value),
}

impl AutomationEvent {
    /// Decodes a raw transport payload.
    pub fn decode(payload: Value) -> Result<Self> {
        Ok(serde_json::from_value(payload)?)
    }

    /// Encodes the event for the transport.
    pub fn encode(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Wire tag of the event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ActionStarted(_) => "action_started",
            Self::ActionCompleted(_) => "action_completed",
            Self::Error(_) => "error",
        }
    }
}

/// Notification delivered on the global shortcut channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutNotification {
    OpenCommandPalette,
}

impl ShortcutNotification {
    /// Interprets a raw shortcut payload. Unknown payloads yield `None`.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        match payload.as_str() {
            Some(COMMAND_PALETTE_PAYLOAD) => Some(Self::OpenCommandPalette),
            _ => None,
        }
    }

    pub fn to_payload(self) -> Value {
        match self {
            Self::OpenCommandPalette => Value::String(COMMAND_PALETTE_PAYLOAD.to_string()),
        }
    }
}
