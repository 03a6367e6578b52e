//! Store trait
//!
//! The crawler only needs keyed lookup, in-memory mutation and a wholesale
//! flush; loading happens when a backend is constructed.

use crate::storage::RentalRecord;
use crate::StoreResult;

/// Durable mapping from listing identity to record
///
/// `set` never touches disk. `save` replaces the whole backing
/// representation with the current in-memory contents and may be called any
/// number of times (last writer wins).
pub trait RecordStore {
    /// Looks up the record stored under `identity`
    fn get(&self, identity: &str) -> Option<&RentalRecord>;

    /// Returns true if a record exists for `identity`
    fn contains(&self, identity: &str) -> bool {
        self.get(identity).is_some()
    }

    /// Inserts or replaces the record for `identity` in memory
    fn set(&mut self, identity: &str, record: RentalRecord);

    /// Flushes the full in-memory contents to the backing representation
    fn save(&mut self) -> StoreResult<()>;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
