//! Merging fresh extractions with stored records
//!
//! The newest extraction always wins wholesale; only `first_scraped_at` is
//! carried over from the prior record. The change flag is advisory and only
//! decides what gets logged.

use crate::storage::RentalRecord;
use chrono::{DateTime, Utc};

/// Result of reconciling one extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// The record to store
    pub record: RentalRecord,

    /// No prior record existed for the identity
    pub is_new: bool,

    /// Title, price, phone or description differ from the prior record
    pub materially_changed: bool,
}

/// Builds the record to store for an identity
///
/// `incoming` carries the freshly extracted fields; its timestamps are
/// ignored and set here from `now` and the prior record.
pub fn merge(prior: Option<&RentalRecord>, incoming: RentalRecord, now: DateTime<Utc>) -> Reconciled {
    let first_scraped_at = prior.map_or(now, |p| p.first_scraped_at);

    let record = RentalRecord {
        first_scraped_at,
        // a clock stepping backwards must not invert the two timestamps
        last_scraped_at: now.max(first_scraped_at),
        ..incoming
    };

    let materially_changed = prior.is_some_and(|p| has_important_differences(p, &record));

    Reconciled {
        record,
        is_new: prior.is_none(),
        materially_changed,
    }
}

/// Compares the fields whose change is worth reporting
pub fn has_important_differences(old: &RentalRecord, new: &RentalRecord) -> bool {
    old.title != new.title
        || old.price != new.price
        || old.phone != new.phone
        || old.description != new.description
}
