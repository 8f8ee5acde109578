//! Plain-text rendering of session state.
//!
//! Everything here is pure: it turns snapshots into lines and leaves
//! terminal I/O to the caller.

use chrono::{DateTime, Utc};
use nexus_core::action::{ActionRecord, AutomationStats};
use nexus_core::palette::PaletteSession;
use nexus_core::store::SessionState;

const STATUS_PROMPT_CHARS: usize = 50;
pub const READY_STATUS: &str = "Ready • Nexus AI Computer Control";
pub const EMPTY_HISTORY: &str = "No actions yet";

/// Main status text: the running prompt (first 50 chars) or the ready text.
pub fn status_line(state: &SessionState) -> String {
    match (&state.current_action, state.is_running) {
        (Some(action), true) => {
            let truncated: String = action.prompt.chars().take(STATUS_PROMPT_CHARS).collect();
            let ellipsis = if action.prompt.chars().count() > STATUS_PROMPT_CHARS {
                "..."
            } else {
                ""
            };
            format!("Executing: {}{}", truncated, ellipsis)
        }
        _ => READY_STATUS.to_string(),
    }
}

/// Full status bar: status text plus latency, success rate and load.
pub fn status_bar(state: &SessionState) -> String {
    let mut parts = vec![status_line(state)];
    if state.stats.avg_latency_ms > 0.0 {
        parts.push(format!("Avg: {}", format_duration(state.stats.avg_latency_ms)));
    }
    if state.stats.total_actions > 0 {
        parts.push(format!("{:.1}%", state.stats.success_rate));
    }
    parts.push(format!("Load: {}", if state.is_running { "High" } else { "Low" }));
    parts.join("  |  ")
}

pub fn format_duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{}ms", ms.round() as i64)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Human distance between an RFC 3339 timestamp and `now`.
pub fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(then) = DateTime::parse_from_rfc3339(timestamp) else {
        return "Unknown time".to_string();
    };
    let elapsed = now.signed_duration_since(then.with_timezone(&Utc));

    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "just now".to_string()
    } else if hours < 1 {
        format!("{} ago", plural(minutes, "minute"))
    } else if days < 1 {
        format!("about {} ago", plural(hours, "hour"))
    } else if days < 30 {
        format!("{} ago", plural(days, "day"))
    } else if days < 365 {
        format!("about {} ago", plural(days / 30, "month"))
    } else {
        format!("over {} ago", plural(days / 365, "year"))
    }
}

pub fn stats_panel(stats: &AutomationStats) -> Vec<String> {
    vec![
        format!("Avg Latency    {}ms", stats.avg_latency_ms.round() as i64),
        format!("Actions Today  {}", stats.actions_today),
        format!("Success Rate   {:.1}%", stats.success_rate),
        format!("Total Actions  {}", stats.total_actions),
    ]
}

fn history_entry(action: &ActionRecord, now: DateTime<Utc>) -> Vec<String> {
    let mut lines = vec![action.prompt.clone()];
    lines.extend(action.actions.iter().map(|step| format!("  > {}", step)));
    lines.push(format!(
        "  {} • {}    {}",
        if action.success { "Success" } else { "Failed" },
        format_duration(action.duration_ms),
        relative_time(&action.timestamp, now)
    ));
    lines
}

/// History list, most recent first, at most `limit` entries.
pub fn history_list(history: &[ActionRecord], limit: usize, now: DateTime<Utc>) -> Vec<String> {
    if history.is_empty() {
        return vec![EMPTY_HISTORY.to_string()];
    }
    history
        .iter()
        .take(limit)
        .flat_map(|action| history_entry(action, now))
        .collect()
}

/// Palette box: input line and numbered suggestions with the selection marked.
pub fn palette_lines(session: &PaletteSession) -> Vec<String> {
    let mut lines = vec![format!("> {}", session.input())];
    if session.suggestions().is_empty() {
        lines.push("  (no matching commands)".to_string());
    }
    for (index, suggestion) in session.suggestions().iter().enumerate() {
        let marker = if index == session.selected_index() { '*' } else { ' ' };
        lines.push(format!("{} {}. {}", marker, index + 1, suggestion));
    }
    lines
}
