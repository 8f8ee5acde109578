//! Simulated device-control backend.
//!
//! Stands in for the real automation engine: it emits the same lifecycle
//! events a real run would, with randomized timing and outcome, and keeps
//! the backend-side ledger that stats and history are served from.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use nexus_application::EventHub;
use nexus_core::action::{ActionRecord, AutomationStats};
use nexus_core::backend::{CommandDispatcher, HistoryProvider, StatsProvider};
use nexus_core::config::SimulationConfig;
use nexus_core::error::{NexusError, Result};
use nexus_core::event::AutomationEvent;
use rand::Rng;
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::ledger::ActionLedger;

/// Step descriptions for a prompt, chosen by the first matching keyword.
pub fn describe_steps(prompt: &str) -> Vec<String> {
    let prompt = prompt.to_lowercase();
    let steps: &[&str] = if prompt.contains("click") {
        &["Located element", "Clicked successfully"]
    } else if prompt.contains("type") || prompt.contains("write") {
        &["Found input field", "Typed text"]
    } else if prompt.contains("open") {
        &["Launched application", "Window opened"]
    } else if prompt.contains("search") {
        &["Opened search", "Entered query", "Results displayed"]
    } else {
        &["Analyzed screen", "Executed action"]
    };
    steps.iter().map(|s| s.to_string()).collect()
}

/// Outcome of one simulated run, drawn before any await.
struct Draw {
    delay: Duration,
    fails: bool,
    success: bool,
    duration_ms: f64,
}

impl Draw {
    fn from_config(config: &SimulationConfig) -> Self {
        let mut rng = rand::thread_rng();
        let (min_delay, max_delay) = ordered(config.min_delay_ms, config.max_delay_ms);
        let (min_duration, max_duration) = ordered(config.min_duration_ms, config.max_duration_ms);

        Self {
            delay: Duration::from_millis(rng.gen_range(min_delay..=max_delay)),
            fails: rng.gen_bool(config.error_rate.clamp(0.0, 1.0)),
            success: rng.gen_bool(config.success_rate.clamp(0.0, 1.0)),
            duration_ms: rng.gen_range(min_duration..=max_duration),
        }
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a <= b { (a, b) } else { (b, a) }
}

pub struct SimulatedBackend {
    config: SimulationConfig,
    events: EventHub,
    ledger: Arc<Mutex<ActionLedger>>,
}

impl SimulatedBackend {
    pub fn new(config: SimulationConfig, events: EventHub) -> Self {
        Self {
            config,
            events,
            ledger: Arc::new(Mutex::new(ActionLedger::new())),
        }
    }

    fn emit(&self, event: &AutomationEvent) -> Result<()> {
        self.events.emit_automation(event)
    }
}

#[async_trait]
impl CommandDispatcher for SimulatedBackend {
    async fn execute(&self, prompt: &str) -> Result<()> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(NexusError::InvalidCommand(
                "command is empty after trimming".to_string(),
            ));
        }

        tracing::info!("[Backend] Executing automation: {}", prompt);
        self.emit(&AutomationEvent::ActionStarted(ActionRecord::pending(
            prompt,
            Utc::now().to_rfc3339(),
        )))?;

        let draw = Draw::from_config(&self.config);
        tokio::time::sleep(draw.delay).await;

        if draw.fails {
            tracing::warn!("[Backend] Simulated failure for: {}", prompt);
            self.emit(&AutomationEvent::Error(json!({
                "prompt": prompt,
                "message": "Automation failed: target not found on screen",
            })))?;
            // reported through the event channel, the dispatch itself succeeded
            return Ok(());
        }

        let record = ActionRecord {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            actions: describe_steps(prompt),
            success: draw.success,
            duration_ms: draw.duration_ms,
            timestamp: Utc::now().to_rfc3339(),
            screenshots: Some(Vec::new()),
        };

        {
            let mut ledger = self.ledger.lock().await;
            ledger.record(record.clone(), Utc::now().date_naive());
        }

        tracing::info!(
            "[Backend] Completed: id={}, success={}, duration={:.0}ms",
            record.id,
            record.success,
            record.duration_ms
        );
        self.emit(&AutomationEvent::ActionCompleted(record))
    }
}

#[async_trait]
impl StatsProvider for SimulatedBackend {
    async fn fetch_stats(&self) -> Result<AutomationStats> {
        Ok(self.ledger.lock().await.stats().clone())
    }
}

#[async_trait]
impl HistoryProvider for SimulatedBackend {
    async fn recent_actions(&self, limit: usize) -> Result<Vec<ActionRecord>> {
        Ok(self.ledger.lock().await.recent(limit))
    }

    async fn clear_history(&self) -> Result<()> {
        tracing::info!("[Backend] Clearing history");
        self.ledger.lock().await.clear();
        Ok(())
    }
}
