//! Digest of the most recently discovered listings

use crate::sources::SOURCES;
use crate::storage::{JsonStore, RentalRecord};
use chrono::{Local, TimeZone};

/// Returns up to `n` records, newest `first_scraped_at` first
pub fn latest_records(store: &JsonStore, n: usize) -> Vec<(&str, &RentalRecord)> {
    store.take(n, |a, b| b.first_scraped_at.cmp(&a.first_scraped_at))
}

/// Formats one digest line as `[first seen] url` in the given timezone
pub fn digest_line<Tz>(record: &RentalRecord, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "[{}] {}",
        record
            .first_scraped_at
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S"),
        record.url
    )
}

/// Prints the `n` newest records in local time
pub fn print_digest(store: &JsonStore, n: usize) {
    for (_, record) in latest_records(store, n) {
        println!("{}", digest_line(record, &Local));
    }
}

/// Prints the names accepted by `scrape`
pub fn print_sources() {
    println!("Available sources:");
    for source in SOURCES {
        println!("{}", source);
    }
}
