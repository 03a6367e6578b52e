//! URL handling for listing links
//!
//! Listing links arrive in many shapes (relative, with tracking query
//! strings, with `#` anchors). This module turns them into one canonical URL
//! per listing and derives the source-qualified identity used as the store
//! key.

mod canonical;
mod identity;

pub use canonical::canonical_listing_url;
pub use identity::{identity_from_last_segment, identity_from_segment_after, make_identity};
