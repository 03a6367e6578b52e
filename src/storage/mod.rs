//! Storage module for persisting scraped listings
//!
//! This module handles the durable mapping from listing identity to record:
//! - Record and dwelling-kind types as they appear in the store file
//! - The `RecordStore` trait the crawler writes through
//! - A JSON file backend that is loaded once and rewritten wholesale on flush

mod json;
mod traits;

pub use json::JsonStore;
pub use traits::RecordStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of dwelling offered by a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalKind {
    House,
    #[serde(alias = "Appartment")]
    Apartment,
    /// Any kind label this build does not recognize
    #[serde(other)]
    Unknown,
}

impl fmt::Display for RentalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::House => write!(f, "House"),
            Self::Apartment => write!(f, "Apartment"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One scraped listing as persisted in the store
///
/// `first_scraped_at` is written once, when the identity is first seen, and
/// carried over on every later observation. `last_scraped_at` moves forward
/// on each successful re-observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalRecord {
    /// Source tag, e.g. "olx"
    pub source: String,

    /// Canonical listing URL
    pub url: String,

    pub title: String,

    /// Price exactly as displayed by the source
    pub price: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RentalKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_count: Option<u32>,

    /// Fractional for shared or half baths ("1.5 baths")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bath_count: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Posting date as displayed by the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,

    pub first_scraped_at: DateTime<Utc>,

    pub last_scraped_at: DateTime<Utc>,
}
