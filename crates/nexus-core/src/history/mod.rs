//! History persistence.
//!
//! - `repository`: storage trait (`HistoryRepository`)
//! - `bridge`: store hook that mirrors history into the repository
//!   (`PersistenceBridge`)

mod bridge;
mod repository;

pub use bridge::{PERSISTED_HISTORY_LIMIT, PersistenceBridge};
pub use repository::HistoryRepository;
