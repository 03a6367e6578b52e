//! Quick-check probe
//!
//! Looks at listing page 1 only. Sources list newest first, so if every
//! listing there is already stored the run is skipped.

use crate::crawler::fetcher::PageFetcher;
use crate::sources::SiteExtractor;
use crate::storage::RecordStore;
use crate::Result;
use url::Url;

/// Returns true if listing page 1 holds at least one identity not in `store`
///
/// Stops at the first unseen identity. Never looks past page 1.
pub async fn source_has_new_listings(
    fetcher: &mut PageFetcher,
    extractor: &dyn SiteExtractor,
    store: &dyn RecordStore,
    query: &str,
) -> Result<bool> {
    let url = extractor.listing_url(query, 1);
    let page_url = Url::parse(&url)?;
    let markup = fetcher.listing_markup(extractor, &url).await?;

    for header in extractor.listing_headers(&markup, &page_url)? {
        if !store.contains(&header.identity) {
            tracing::info!("Found new listing {} on page 1", header.identity);
            return Ok(true);
        }
    }

    Ok(false)
}
