//! History repository trait.

use crate::action::ActionRecord;
use crate::error::Result;

/// Durable storage for the most recent automation runs.
///
/// Records are stored and returned most recent first. Implementations are
/// called from the store's post-mutation hook, so they are synchronous.
pub trait HistoryRepository: Send + Sync {
    /// Loads persisted history.
    ///
    /// # Returns
    ///
    /// - `Ok(records)`: Stored records, or an empty list if nothing was stored
    /// - `Err(_)`: The stored payload could not be read or parsed
    fn load(&self) -> Result<Vec<ActionRecord>>;

    /// Replaces the persisted history with `records`.
    fn save(&self, records: &[ActionRecord]) -> Result<()>;
}
