//! Storage layer for atomic file operations.

pub mod atomic_file;
mod slot_store;
mod toml_file;

pub use slot_store::{SlotStore, SlotStoreError};
pub use toml_file::{TomlFile, TomlFileError};
