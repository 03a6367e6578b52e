use url::Url;

/// Builds a source-qualified identity, e.g. `olx:flat-ID9x`
pub fn make_identity(source: &str, id_segment: &str) -> String {
    format!("{}:{}", source, id_segment)
}

/// Derives an identity from the last path segment of a listing URL
///
/// A trailing `.html` is dropped so `/d/obyavlenie/flat-ID9x.html` and a
/// future `/d/obyavlenie/flat-ID9x` map to the same listing.
///
/// # Returns
///
/// * `Some(String)` - The identity
/// * `None` - The URL has no usable last segment
///
/// # Examples
///
/// ```
/// use rentscraper::url::identity_from_last_segment;
/// use url::Url;
///
/// let url = Url::parse("https://www.olx.ua/d/obyavlenie/flat-ID9x.html").unwrap();
/// assert_eq!(identity_from_last_segment("olx", &url), Some("olx:flat-ID9x".to_string()));
/// ```
pub fn identity_from_last_segment(source: &str, url: &Url) -> Option<String> {
    let last = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?;
    let id = last.strip_suffix(".html").unwrap_or(last);
    if id.is_empty() {
        return None;
    }
    Some(make_identity(source, id))
}

/// Derives an identity from the path segment that follows `marker`
///
/// # Examples
///
/// ```
/// use rentscraper::url::identity_from_segment_after;
/// use url::Url;
///
/// let url = Url::parse("https://www.airbnb.com/rooms/53119164").unwrap();
/// assert_eq!(
///     identity_from_segment_after("airbnb", &url, "rooms"),
///     Some("airbnb:53119164".to_string())
/// );
/// ```
pub fn identity_from_segment_after(source: &str, url: &Url, marker: &str) -> Option<String> {
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == marker)?;
    let id = segments.next().filter(|segment| !segment.is_empty())?;
    Some(make_identity(source, id))
}
