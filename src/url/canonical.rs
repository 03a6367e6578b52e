use crate::ExtractError;
use url::Url;

/// Resolves a listing link to its canonical URL
///
/// # Canonicalization Steps
///
/// 1. Trim whitespace; reject empty links
/// 2. Resolve relative links against `base`
/// 3. Reject anything that is not HTTP(S)
/// 4. Remove the fragment (everything after #)
/// 5. Remove the query string; listing feeds append search and tracking
///    parameters that differ between visits of the same listing
///
/// # Arguments
///
/// * `href` - The raw link as found in the markup
/// * `base` - URL of the page the link was found on
///
/// # Examples
///
/// ```
/// use rentscraper::url::canonical_listing_url;
/// use url::Url;
///
/// let base = Url::parse("https://www.olx.ua/nedvizhimost/kiev/").unwrap();
/// let url = canonical_listing_url("/d/obyavlenie/flat-ID9x.html?reason=feed#gallery", &base).unwrap();
/// assert_eq!(url.as_str(), "https://www.olx.ua/d/obyavlenie/flat-ID9x.html");
/// ```
pub fn canonical_listing_url(href: &str, base: &Url) -> Result<Url, ExtractError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(ExtractError::MissingField {
            field: "url",
            context: format!("empty link on {}", base),
        });
    }

    let mut url = base.join(href).map_err(|e| ExtractError::Malformed {
        field: "url",
        value: format!("{} ({})", href, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ExtractError::Malformed {
            field: "url",
            value: href.to_string(),
        });
    }

    url.set_fragment(None);
    url.set_query(None);

    Ok(url)
}
