//! Backend side of Nexus.
//!
//! Hosts the simulated device-control backend that executes commands,
//! reports run lifecycle events, and serves stats and history.

pub mod ledger;
pub mod simulated;

pub use ledger::{ActionLedger, LEDGER_CAPACITY};
pub use simulated::{SimulatedBackend, describe_steps};
