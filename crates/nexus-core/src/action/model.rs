//! Action domain models.

use serde::{Deserialize, Serialize};

/// One automation run as reported by the backend.
///
/// Completed runs arrive fully populated and are never mutated afterwards;
/// the in-progress payload carried by `action_started` usually holds only
/// `prompt` and `timestamp`, so every other field falls back to its default
/// when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Opaque identifier assigned by the backend.
    #[serde(default)]
    pub id: String,
    /// The natural-language command that started the run.
    pub prompt: String,
    /// Human-readable step descriptions, in execution order.
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub duration_ms: f64,
    /// Completion time, ISO-8601 encoded.
    #[serde(default)]
    pub timestamp: String,
    /// Opaque screenshot references. Carried, never inspected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshots: Option<Vec<String>>,
}

impl ActionRecord {
    /// Creates an in-progress record for a prompt that has just started.
    pub fn pending(prompt: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            prompt: prompt.into(),
            actions: Vec::new(),
            success: false,
            duration_ms: 0.0,
            timestamp: timestamp.into(),
            screenshots: None,
        }
    }
}

/// Aggregate counters computed by the backend.
///
/// The front end only stores and displays the latest snapshot; it never
/// derives these values itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationStats {
    pub total_actions: u64,
    /// Percentage in `0..=100`.
    pub success_rate: f64,
    pub avg_latency_ms: f64,
    pub actions_today: u64,
    pub fastest_action_ms: f64,
    pub slowest_action_ms: f64,
}

impl Default for AutomationStats {
    fn default() -> Self {
        Self {
            total_actions: 0,
            success_rate: 100.0,
            avg_latency_ms: 0.0,
            actions_today: 0,
            fastest_action_ms: 0.0,
            slowest_action_ms: 0.0,
        }
    }
}
