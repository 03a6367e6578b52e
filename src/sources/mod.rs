//! Listing sources
//!
//! Each source is a `SiteExtractor`; the crawler is the same for all of
//! them. Adding a source means adding an extractor here and registering its
//! name in `SOURCES`.

mod airbnb;
mod html;
pub mod labels;
mod olx;
mod traits;

pub use airbnb::AirbnbExtractor;
pub use olx::OlxExtractor;
pub use traits::{Contact, ListingHeader, PropertyDetails, SiteExtractor};

use crate::{Result, ScraperError};

/// Names accepted by `build_extractor`
pub const SOURCES: &[&str] = &["olx", "airbnb"];

/// Builds the extractor for a source name
///
/// # Returns
///
/// * `Ok(extractor)` - The name is a known source
/// * `Err(ScraperError::UnknownSource)` - No source with that name
pub fn build_extractor(name: &str) -> Result<Box<dyn SiteExtractor>> {
    match name {
        "olx" => Ok(Box::new(OlxExtractor::new())),
        "airbnb" => Ok(Box::new(AirbnbExtractor::new())),
        _ => Err(ScraperError::UnknownSource(name.to_string())),
    }
}
