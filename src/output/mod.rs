//! Output module for reading results back out of the store
//!
//! This module handles:
//! - The newest-first digest of stored listings
//! - Listing the available sources

mod digest;

pub use digest::{digest_line, latest_records, print_digest, print_sources};
