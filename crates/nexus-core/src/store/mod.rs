//! Automation session store.
//!
//! # Module Structure
//!
//! - `state`: the session record (`SessionState`) and its invariants
//! - `automation_store`: the exclusive-writer owner of that record
//!   (`AutomationStore`) and its post-mutation history hook
//!   (`HistoryObserver`)

mod automation_store;
mod state;

pub use automation_store::{AutomationStore, HistoryObserver};
pub use state::{HISTORY_CAPACITY, SessionState};
