//! Automation run records and aggregate statistics.

mod model;

pub use model::{ActionRecord, AutomationStats};
