//! Extractor traits and the values they produce
//!
//! Extractors are pure functions over markup snapshots. They know a site's
//! URLs, selectors and label text; they never fetch anything themselves.

use crate::storage::RentalKind;
use crate::ExtractError;
use url::Url;

/// Fields of one listing visible on a feed page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingHeader {
    /// Source-qualified identity, e.g. `olx:flat-ID9x`
    pub identity: String,

    /// Canonical listing URL
    pub url: String,

    pub title: String,

    /// Posting date as displayed; required by sources that show one
    pub posted_at: Option<String>,

    /// Price exactly as displayed
    pub price: String,

    /// Details already present on the feed, for sources without detail pages
    pub details: Option<PropertyDetails>,
}

/// Structured fields parsed from free-text property descriptions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDetails {
    pub kind: Option<RentalKind>,
    pub room_count: Option<u32>,
    pub floor_count: Option<u32>,
    pub guest_count: Option<u32>,
    pub bed_count: Option<u32>,
    pub bath_count: Option<f32>,
}

/// State of a contact field that must be revealed by an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    /// The value is visible
    Revealed(String),
    /// The field exists but still shows a masked placeholder
    Pending,
    /// No contact field on the page
    Absent,
}

/// Site-specific knowledge needed to crawl one listing source
///
/// Every method except the header-level ones is lenient: a missing detail
/// field is `None`/empty, never an error. `listing_headers` is strict
/// because a header without its required fields means the selectors no
/// longer match the site.
pub trait SiteExtractor: Send + Sync {
    /// Source tag stored on every record and used as identity prefix
    fn source(&self) -> &'static str;

    /// URL of listing page `page` (1-based) for a search query
    fn listing_url(&self, query: &str, page: u32) -> String;

    /// Returns true once a listing page has finished rendering
    fn listing_ready(&self, _markup: &str) -> bool {
        true
    }

    /// All listing headers on a feed page, in document order
    fn listing_headers(
        &self,
        markup: &str,
        page_url: &Url,
    ) -> Result<Vec<ListingHeader>, ExtractError>;

    /// Last page number advertised by a feed page, if any
    fn total_page_count(&self, markup: &str) -> Option<u32>;

    /// Whether listings need a detail-page visit to complete their record
    fn visits_detail_pages(&self) -> bool {
        true
    }

    /// Selector of the control that reveals the contact field
    fn reveal_selector(&self) -> Option<&str> {
        None
    }

    /// Whether the detail page demands a login before revealing contacts
    fn auth_required(&self, _markup: &str) -> bool {
        false
    }

    /// Whether the reveal control is present and clickable
    fn reveal_is_available(&self, _markup: &str) -> bool {
        false
    }

    /// Current state of the revealed contact field
    fn revealed_contact(&self, _markup: &str) -> Contact {
        Contact::Absent
    }

    /// Free-text description of a listing
    fn description(&self, _markup: &str) -> Option<String> {
        None
    }

    /// Raw text of every property box on a detail page
    fn property_detail_boxes(&self, _markup: &str) -> Vec<String> {
        Vec::new()
    }

    /// Parses property boxes into structured fields
    fn parse_property_boxes(&self, _boxes: &[String]) -> PropertyDetails {
        PropertyDetails::default()
    }
}
