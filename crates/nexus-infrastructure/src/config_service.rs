//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the application
//! configuration from `config.toml`, creating it with defaults on first run.

use nexus_core::config::AppConfig;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::paths::NexusPaths;
use crate::storage::TomlFile;

/// Configuration service that loads and caches [`AppConfig`].
///
/// A missing file is created with defaults. A file that cannot be parsed is
/// left untouched, logged, and replaced by defaults in memory.
#[derive(Clone)]
pub struct ConfigService {
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<AppConfig>>>,
    path: Option<PathBuf>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the resolved config
    /// directory. The file is loaded lazily on first access.
    pub fn new(paths: &NexusPaths) -> Self {
        let path = match paths.config_file() {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("[Config] Cannot resolve config file: {}", e);
                None
            }
        };
        Self::with_path(path)
    }

    /// Creates a service for an explicit file (`None` means defaults only).
    pub fn with_path(path: Option<PathBuf>) -> Self {
        Self {
            config: Arc::new(RwLock::new(None)),
            path,
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> AppConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config();

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> AppConfig {
        let Some(path) = &self.path else {
            return AppConfig::default();
        };

        let file = TomlFile::<AppConfig>::new(path.clone());
        match file.load_or_create(AppConfig::default()) {
            Ok(config) => {
                tracing::debug!("[Config] Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!(
                    "[Config] Failed to load {:?}, using defaults: {}",
                    path,
                    e
                );
                AppConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(Some(path.clone()));

        assert_eq!(service.get_config(), AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_reads_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[shortcut]\naccelerator = \"Ctrl+Alt+N\"\n").unwrap();

        let service = ConfigService::with_path(Some(path));
        assert_eq!(service.get_config().shortcut.accelerator, "Ctrl+Alt+N");
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[shortcut\naccelerator = ").unwrap();

        let service = ConfigService::with_path(Some(path.clone()));
        assert_eq!(service.get_config(), AppConfig::default());
        // the broken file is kept for the user to fix
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("[shortcut\n"));
    }

    #[test]
    fn test_cache_and_invalidate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(Some(path.clone()));
        service.get_config();

        std::fs::write(&path, "[logging]\nlevel = \"trace\"\n").unwrap();
        assert_eq!(service.get_config().logging.level, "info");

        service.invalidate_cache();
        assert_eq!(service.get_config().logging.level, "trace");
    }
}
