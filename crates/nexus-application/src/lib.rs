//! Application layer for Nexus.
//!
//! This crate wires the domain store to the outside world: it runs the
//! single-owner session task, ingests lifecycle events from the transport,
//! and dispatches commands and stats requests to the backend.

pub mod command_service;
pub mod ingestion;
pub mod persistence;
pub mod runtime;
pub mod subscription;
pub mod transport;

pub use command_service::CommandService;
pub use ingestion::{EventIngestion, Reaction, RunPhase};
pub use persistence::BackgroundHistoryWriter;
pub use runtime::{SessionHandle, SessionMessage, SessionRuntime};
pub use subscription::{Subscription, SubscriptionSet, listen_automation_events, listen_shortcuts};
pub use transport::EventHub;
