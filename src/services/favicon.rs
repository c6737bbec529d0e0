//! URL validation and favicon derivation.

use reqwest::Url;

use crate::types::errors::StoreError;

/// Parses `raw` and requires an `http`/`https` scheme with a host.
pub fn parse_http_url(raw: &str) -> Result<Url, StoreError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| StoreError::ValidationFailure(format!("invalid url '{}': {}", raw, e)))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(StoreError::ValidationFailure(format!(
            "invalid url '{}': must be http:// or https://",
            raw
        )));
    }
    Ok(url)
}

/// Favicon location for a page: `<origin>/favicon.ico`.
///
/// Depends only on the URL's origin, so two pages on one site share a favicon.
pub fn favicon_for(raw: &str) -> Option<String> {
    let url = parse_http_url(raw).ok()?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(format!("{}/favicon.ico", origin.ascii_serialization()))
}
