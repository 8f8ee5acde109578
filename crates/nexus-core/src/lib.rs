//! Domain layer for Nexus.
//!
//! Holds the client-side automation state machine and command-resolution
//! pipeline: suggestion filtering, palette interaction, the session store and
//! its persistence hook, plus the interfaces to the backend. Nothing in this
//! crate performs I/O.

pub mod action;
pub mod backend;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod palette;
pub mod store;
pub mod suggestion;

// Re-export common error type
pub use error::NexusError;
