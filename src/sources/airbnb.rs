//! Airbnb search results
//!
//! Everything stored for an Airbnb listing is on the search feed itself, so
//! no detail page is ever visited. Listing cards carry schema.org microdata
//! (`itemprop`) for the name and URL; the remaining fields sit in generated
//! class names.

use crate::sources::html::{first_attr, first_text, selector, text_of};
use crate::sources::traits::{ListingHeader, PropertyDetails, SiteExtractor};
use crate::url::{canonical_listing_url, identity_from_segment_after};
use crate::ExtractError;
use scraper::{ElementRef, Html};
use url::Url;

const SOURCE: &str = "airbnb";
const BASE_URL: &str = "https://www.airbnb.com";

/// Cards per search page; the feed pages by item offset
const PAGE_SIZE: u32 = 20;

const OFFER: &str = r#"[itemprop="itemListElement"]"#;
const OFFER_NAME: &str = r#"[itemprop="name"]"#;
const OFFER_URL: &str = r#"[itemprop="url"]"#;
const OFFER_DETAILS: &str = ".i1wgresd.dir.dir-ltr";
const OFFER_PRICE: &str = ".p1qe1cgb.dir.dir-ltr .a8jt5op";
const PAGINATION: &str = r#"[aria-label="Search results pagination"]"#;

/// Extractor for Airbnb home search results
#[derive(Debug, Clone)]
pub struct AirbnbExtractor {
    base_url: String,
}

impl AirbnbExtractor {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Extractor whose listing URLs start at `base_url` instead of airbnb.com
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn header(&self, offer: ElementRef<'_>, page_url: &Url) -> Result<ListingHeader, ExtractError> {
        let title = first_attr(offer, &selector(OFFER_NAME)?, "content")
            .ok_or_else(|| missing("title", page_url))?;

        let raw_url = first_attr(offer, &selector(OFFER_URL)?, "content")
            .ok_or_else(|| missing("url", page_url))?;
        // microdata URLs come without a scheme
        let raw_url = if raw_url.starts_with("www.") {
            format!("https://{}", raw_url)
        } else {
            raw_url
        };
        let url = canonical_listing_url(&raw_url, page_url)?;
        let identity = identity_from_segment_after(SOURCE, &url, "rooms")
            .ok_or_else(|| missing("identity", page_url))?;

        let price =
            first_text(offer, &selector(OFFER_PRICE)?).ok_or_else(|| missing("price", page_url))?;

        let details = first_text(offer, &selector(OFFER_DETAILS)?)
            .map(|text| parse_card_details(&text))
            .unwrap_or_default();

        Ok(ListingHeader {
            identity,
            url: url.to_string(),
            title,
            posted_at: None,
            price,
            details: Some(details),
        })
    }
}

impl Default for AirbnbExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(field: &'static str, page_url: &Url) -> ExtractError {
    ExtractError::MissingField {
        field,
        context: format!("card on {}", page_url),
    }
}

/// Parses a card summary such as `4 guests · 2 bedrooms · 3 beds · 1.5 shared baths`
///
/// Bedrooms are stored as the room count. Counts that are not on the card
/// stay unset.
pub fn parse_card_details(text: &str) -> PropertyDetails {
    let tokens: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == '·' || c == ',')
        .filter(|token| !token.is_empty())
        .collect();

    let mut details = PropertyDetails::default();

    for (i, token) in tokens.iter().enumerate() {
        let Ok(value) = token.parse::<f32>() else {
            continue;
        };
        let mut unit = tokens.get(i + 1).copied().unwrap_or("");
        if unit.eq_ignore_ascii_case("shared") || unit.eq_ignore_ascii_case("private") {
            unit = tokens.get(i + 2).copied().unwrap_or("");
        }

        match unit.to_ascii_lowercase().as_str() {
            "guest" | "guests" => details.guest_count = whole(value),
            "bedroom" | "bedrooms" => details.room_count = whole(value),
            "bed" | "beds" => details.bed_count = whole(value),
            "bath" | "baths" | "bathroom" | "bathrooms" => details.bath_count = Some(value),
            _ => {}
        }
    }

    details
}

fn whole(value: f32) -> Option<u32> {
    (value >= 0.0 && value.fract() == 0.0).then_some(value as u32)
}

impl SiteExtractor for AirbnbExtractor {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn listing_url(&self, query: &str, page: u32) -> String {
        let offset = page.saturating_sub(1) * PAGE_SIZE;
        format!(
            "{}/s/{}/homes?items_offset={}",
            self.base_url,
            query.trim_matches('/'),
            offset
        )
    }

    fn listing_ready(&self, markup: &str) -> bool {
        match selector(PAGINATION) {
            Ok(sel) => Html::parse_document(markup).select(&sel).next().is_some(),
            Err(_) => false,
        }
    }

    fn listing_headers(
        &self,
        markup: &str,
        page_url: &Url,
    ) -> Result<Vec<ListingHeader>, ExtractError> {
        let doc = Html::parse_document(markup);
        let offer = selector(OFFER)?;

        doc.select(&offer)
            .map(|element| self.header(element, page_url))
            .collect()
    }

    /// Highest page number linked from the pagination bar
    fn total_page_count(&self, markup: &str) -> Option<u32> {
        let pagination = selector(PAGINATION).ok()?;
        let anchor = selector("a").ok()?;
        let doc = Html::parse_document(markup);
        let bar = doc.select(&pagination).next()?;

        bar.select(&anchor)
            .filter_map(|a| text_of(a).parse::<u32>().ok())
            .max()
    }

    fn visits_detail_pages(&self) -> bool {
        false
    }
}
