//! Typed TOML file on top of [`atomic_file`](super::atomic_file).

use serde::{Serialize, de::DeserializeOwned};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use super::atomic_file;

/// Errors that can occur during TOML file operations.
#[derive(Debug)]
pub enum TomlFileError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parse error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
}

impl std::fmt::Display for TomlFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TomlFileError::IoError(e) => write!(f, "I/O error: {}", e),
            TomlFileError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            TomlFileError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
        }
    }
}

impl std::error::Error for TomlFileError {}

impl From<std::io::Error> for TomlFileError {
    fn from(e: std::io::Error) -> Self {
        TomlFileError::IoError(e)
    }
}

impl From<toml::de::Error> for TomlFileError {
    fn from(e: toml::de::Error) -> Self {
        TomlFileError::TomlError(e)
    }
}

impl From<toml::ser::Error> for TomlFileError {
    fn from(e: toml::ser::Error) -> Self {
        TomlFileError::TomlSerError(e)
    }
}

impl From<TomlFileError> for nexus_core::NexusError {
    fn from(e: TomlFileError) -> Self {
        match e {
            TomlFileError::IoError(e) => e.into(),
            TomlFileError::TomlError(e) => e.into(),
            TomlFileError::TomlSerError(e) => e.into(),
        }
    }
}

/// A handle to a TOML file holding one `T`.
pub struct TomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> TomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, TomlFileError> {
        match atomic_file::read_optional(&self.path)? {
            Some(content) => Ok(Some(toml::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// Serializes `data` and replaces the file atomically.
    pub fn save(&self, data: &T) -> Result<(), TomlFileError> {
        let content = toml::to_string_pretty(data)?;
        atomic_file::write_atomic(&self.path, content.as_bytes())?;
        Ok(())
    }

    /// Loads the file, writing `default_value` first if it is missing.
    pub fn load_or_create(&self, default_value: T) -> Result<T, TomlFileError> {
        match self.load()? {
            Some(data) => Ok(data),
            None => {
                self.save(&default_value)?;
                Ok(default_value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestConfig {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = TomlFile::<TestConfig>::new(temp_dir.path().join("test.toml"));

        let config = TestConfig {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&config).unwrap();

        assert_eq!(file.load().unwrap(), Some(config));
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let temp_dir = TempDir::new().unwrap();
        let file = TomlFile::<TestConfig>::new(temp_dir.path().join("test.toml"));
        let default_config = TestConfig {
            name: "default".to_string(),
            count: 0,
        };

        let loaded = file.load_or_create(default_config.clone()).unwrap();
        assert_eq!(loaded, default_config);
        assert!(file.path().exists());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.toml");
        std::fs::write(&path, "name = [unclosed").unwrap();

        let file = TomlFile::<TestConfig>::new(path);
        assert!(matches!(file.load(), Err(TomlFileError::TomlError(_))));
    }
}
