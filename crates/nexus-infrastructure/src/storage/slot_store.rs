//! Durable key-value slots, one file per key.
//!
//! Each slot holds an opaque string (JSON in practice) in
//! `<dir>/<key>.json`. Keys are restricted to `[A-Za-z0-9_-]` so they map
//! to plain file names.

use std::path::{Path, PathBuf};

use super::atomic_file;

/// Errors that can occur during slot operations.
#[derive(Debug)]
pub enum SlotStoreError {
    /// File I/O error.
    IoError(std::io::Error),
    /// Key contains characters that cannot be used in a file name.
    InvalidKey(String),
}

impl std::fmt::Display for SlotStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotStoreError::IoError(e) => write!(f, "I/O error: {}", e),
            SlotStoreError::InvalidKey(key) => write!(f, "Invalid slot key: {:?}", key),
        }
    }
}

impl std::error::Error for SlotStoreError {}

impl From<std::io::Error> for SlotStoreError {
    fn from(e: std::io::Error) -> Self {
        SlotStoreError::IoError(e)
    }
}

impl From<SlotStoreError> for nexus_core::NexusError {
    fn from(e: SlotStoreError) -> Self {
        match e {
            SlotStoreError::IoError(e) => e.into(),
            SlotStoreError::InvalidKey(key) => {
                nexus_core::NexusError::config(format!("Invalid slot key: {}", key))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads a slot. Missing or blank slots read as `None`.
    pub fn get(&self, key: &str) -> Result<Option<String>, SlotStoreError> {
        let path = self.slot_path(key)?;
        Ok(atomic_file::read_optional(&path)?)
    }

    /// Replaces a slot's value atomically.
    pub fn set(&self, key: &str, value: &str) -> Result<(), SlotStoreError> {
        let path = self.slot_path(key)?;
        atomic_file::write_atomic(&path, value.as_bytes())?;
        Ok(())
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf, SlotStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SlotStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}
