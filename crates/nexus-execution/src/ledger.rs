//! Backend-side record of finished runs and the stats derived from it.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use nexus_core::action::{ActionRecord, AutomationStats};

/// Number of runs the backend keeps.
pub const LEDGER_CAPACITY: usize = 100;

/// Oldest-first list of finished runs.
///
/// `total_actions` counts every run recorded since the last clear, including
/// evicted ones. The other figures cover the retained window only.
#[derive(Debug, Clone)]
pub struct ActionLedger {
    records: VecDeque<ActionRecord>,
    capacity: usize,
    stats: AutomationStats,
}

impl Default for ActionLedger {
    fn default() -> Self {
        Self::with_capacity(LEDGER_CAPACITY)
    }
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            stats: AutomationStats::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &AutomationStats {
        &self.stats
    }

    /// Appends a finished run and recomputes stats for `today` (UTC).
    pub fn record(&mut self, action: ActionRecord, today: NaiveDate) {
        self.records.push_back(action);
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }

        let total_actions = self.stats.total_actions + 1;
        self.stats = self.compute_stats(total_actions, today);
    }

    /// Most recent first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> Vec<ActionRecord> {
        self.records.iter().rev().take(limit).cloned().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.stats = AutomationStats::default();
    }

    fn compute_stats(&self, total_actions: u64, today: NaiveDate) -> AutomationStats {
        if self.records.is_empty() {
            return AutomationStats {
                total_actions,
                ..AutomationStats::default()
            };
        }

        let count = self.records.len() as f64;
        let successes = self.records.iter().filter(|r| r.success).count() as f64;
        let durations = self.records.iter().map(|r| r.duration_ms);
        let fastest = durations.clone().fold(f64::INFINITY, f64::min);
        let slowest = durations.clone().fold(0.0, f64::max);
        let total_ms: f64 = durations.sum();
        let actions_today = self
            .records
            .iter()
            .filter(|r| utc_date(&r.timestamp) == Some(today))
            .count() as u64;

        AutomationStats {
            total_actions,
            success_rate: successes / count * 100.0,
            avg_latency_ms: total_ms / count,
            actions_today,
            fastest_action_ms: fastest,
            slowest_action_ms: slowest,
        }
    }
}

fn utc_date(timestamp: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc).date_naive())
}
