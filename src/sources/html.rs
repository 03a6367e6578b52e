//! Small helpers over `scraper` shared by the extractors

use crate::ExtractError;
use scraper::{ElementRef, Selector};

/// Parses a CSS selector
pub fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{}: {:?}", css, e)))
}

/// Text content of an element with whitespace runs collapsed
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text content of an element with only the ends trimmed
///
/// Keeps the line breaks of free-text blocks such as descriptions.
pub fn block_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first match of `selector` under `element`, if non-empty
pub fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(text_of)
        .filter(|text| !text.is_empty())
}

/// Attribute of the first match of `selector` under `element`, if non-empty
pub fn first_attr(element: ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
