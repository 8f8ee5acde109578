//! Unified path management for Nexus files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/nexus/             # Config directory
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── nexus-desktop.log.YYYY-MM-DD
//!
//! ~/.local/share/nexus/        # Data directory
//! └── slots/                   # Key-value slot files
//!     └── automation-history.json
//! ```
//!
//! Setting `NEXUS_HOME` (or passing a base directory) places both trees
//! under `<base>/config` and `<base>/data` instead.

use std::path::PathBuf;

/// Environment variable overriding the platform directories.
pub const NEXUS_HOME_ENV: &str = "NEXUS_HOME";

const APP_DIR_NAME: &str = "nexus";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves every file location used by Nexus.
#[derive(Debug, Clone)]
pub struct NexusPaths {
    base: Option<PathBuf>,
}

impl NexusPaths {
    /// Creates a resolver.
    ///
    /// With `base = None` the `NEXUS_HOME` variable is consulted, then the
    /// platform config/data directories.
    pub fn new(base: Option<PathBuf>) -> Self {
        let base = base.or_else(|| std::env::var_os(NEXUS_HOME_ENV).map(PathBuf::from));
        Self { base }
    }

    /// Returns the configuration directory (e.g., `~/.config/nexus/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("config")),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the data directory (e.g., `~/.local/share/nexus/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.join("data")),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::HomeDirNotFound),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }

    /// Returns the directory holding key-value slot files.
    pub fn slot_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("slots"))
    }
}

impl Default for NexusPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
