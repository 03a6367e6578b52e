//! OLX real-estate listings
//!
//! Feed pages are server rendered; the seller's phone on a detail page is
//! masked until the "show phone" button is clicked, and anonymous visitors
//! are sometimes asked to log in instead.

use crate::sources::html::{block_text, first_attr, first_text, selector, text_of};
use crate::sources::labels::{self, LabelSet};
use crate::sources::traits::{Contact, ListingHeader, PropertyDetails, SiteExtractor};
use crate::url::{canonical_listing_url, identity_from_last_segment};
use crate::ExtractError;
use scraper::{ElementRef, Html};
use url::Url;

const SOURCE: &str = "olx";
const BASE_URL: &str = "https://www.olx.ua/nedvizhimost";

const OFFER: &str = "table.offers tr.wrap";
const OFFER_TITLE_LINK: &str = ".title-cell a.linkWithHash";
const OFFER_POSTING_DATE: &str = ".bottom-cell small";
const OFFER_PRICE: &str = ".price";
const CURRENT_PAGE: &str = r#"[data-cy="page-link-current"]"#;
const LAST_PAGE: &str = r#"[data-cy="page-link-last"]"#;
const SHOW_PHONE: &str = r#"[data-testid="show-phone"]"#;
const AUTH_PROMPT: &str = r#"[data-testid="prompt-message"]"#;
const PHONES: &str = r#"[data-testid="phones-container"]"#;
const DESCRIPTION: &str = r#"[data-cy="ad_description"]"#;
const PROPERTY_BOX: &str = "ul li p";

/// Placeholder shown in the phone field until it is revealed
const PHONE_MASK: &str = "xxx";

const LABELS: LabelSet = LabelSet {
    kind_label: "Тип дома",
    house_fragments: &["Дом", "Коттедж", "Дача"],
    apartment_fragments: &["Квартира", "Часть дома"],
    room_label: "комнат",
    floor_label: "Этажность",
};

/// Extractor for olx.ua real-estate search results
#[derive(Debug, Clone)]
pub struct OlxExtractor {
    base_url: String,
}

impl OlxExtractor {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Extractor whose listing URLs start at `base_url` instead of olx.ua
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn header(&self, offer: ElementRef<'_>, page_url: &Url) -> Result<ListingHeader, ExtractError> {
        let title_link = selector(OFFER_TITLE_LINK)?;

        let href = first_attr(offer, &title_link, "href").ok_or_else(|| missing("url", page_url))?;
        let url = canonical_listing_url(&href, page_url)?;
        let identity =
            identity_from_last_segment(SOURCE, &url).ok_or_else(|| missing("identity", page_url))?;

        let title = first_text(offer, &title_link).ok_or_else(|| missing("title", page_url))?;

        let posted_at = offer
            .select(&selector(OFFER_POSTING_DATE)?)
            .last()
            .map(text_of)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| missing("posted_at", page_url))?;

        let price =
            first_text(offer, &selector(OFFER_PRICE)?).ok_or_else(|| missing("price", page_url))?;

        Ok(ListingHeader {
            identity,
            url: url.to_string(),
            title,
            posted_at: Some(posted_at),
            price,
            details: None,
        })
    }
}

impl Default for OlxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(field: &'static str, page_url: &Url) -> ExtractError {
    ExtractError::MissingField {
        field,
        context: format!("offer on {}", page_url),
    }
}

/// Returns true when `css` matches anything in `markup`
fn has_match(markup: &str, css: &str) -> bool {
    match selector(css) {
        Ok(sel) => Html::parse_document(markup).select(&sel).next().is_some(),
        Err(_) => false,
    }
}

fn first_text_in(markup: &str, css: &str) -> Option<String> {
    let sel = selector(css).ok()?;
    let doc = Html::parse_document(markup);
    first_text(doc.root_element(), &sel)
}

impl SiteExtractor for OlxExtractor {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn listing_url(&self, query: &str, page: u32) -> String {
        format!("{}/{}/?page={}", self.base_url, query.trim_matches('/'), page)
    }

    fn listing_ready(&self, markup: &str) -> bool {
        has_match(markup, CURRENT_PAGE)
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

    fn total_page_count(&self, markup: &str) -> Option<u32> {
        first_text_in(markup, LAST_PAGE)?.trim().parse().ok()
    }

    fn reveal_selector(&self) -> Option<&str> {
        Some(SHOW_PHONE)
    }

    fn auth_required(&self, markup: &str) -> bool {
        has_match(markup, AUTH_PROMPT)
    }

    fn reveal_is_available(&self, markup: &str) -> bool {
        has_match(markup, SHOW_PHONE)
    }

    fn revealed_contact(&self, markup: &str) -> Contact {
        let Ok(sel) = selector(PHONES) else {
            return Contact::Absent;
        };
        let doc = Html::parse_document(markup);
        match doc.select(&sel).next().map(text_of) {
            None => Contact::Absent,
            Some(text) if text.is_empty() || text.contains(PHONE_MASK) => Contact::Pending,
            Some(text) => Contact::Revealed(text),
        }
    }

    fn description(&self, markup: &str) -> Option<String> {
        let sel = selector(DESCRIPTION).ok()?;
        Html::parse_document(markup)
            .select(&sel)
            .next()
            .map(block_text)
            .filter(|text| !text.is_empty())
    }

    fn property_detail_boxes(&self, markup: &str) -> Vec<String> {
        let Ok(sel) = selector(PROPERTY_BOX) else {
            return Vec::new();
        };
        Html::parse_document(markup)
            .select(&sel)
            .map(text_of)
            .filter(|text| !text.is_empty())
            .collect()
    }

    fn parse_property_boxes(&self, boxes: &[String]) -> PropertyDetails {
        labels::parse_property_boxes(boxes, &LABELS)
    }
}
