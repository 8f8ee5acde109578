//! Application configuration model (`config.toml`).

use serde::{Deserialize, Serialize};

/// Accelerator bound to "open the command palette" unless configured.
pub const DEFAULT_ACCELERATOR: &str = "CommandOrControl+Shift+Space";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub shortcut: ShortcutConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub simulation: SimulationConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShortcutConfig {
    pub accelerator: String,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            accelerator: DEFAULT_ACCELERATOR.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `NEXUS_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the key-value slot files. Defaults to the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_dir: Option<String>,
}

/// Timing and outcome knobs for the simulated backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    /// Probability that a finished run is reported as successful.
    pub success_rate: f64,
    /// Probability that a run fails with an `error` event instead of finishing.
    pub error_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 1500,
            min_duration_ms: 150.0,
            max_duration_ms: 450.0,
            success_rate: 0.95,
            error_rate: 0.0,
        }
    }
}
