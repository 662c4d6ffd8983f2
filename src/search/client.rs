//! Search service request construction.

use axum::http::Uri;
use url::Url;

/// Error building the upstream search URI.
#[derive(Debug, thiserror::Error)]
pub enum SearchUriError {
    #[error("invalid search base URL: {0}")]
    Base(#[from] url::ParseError),

    #[error("search URL is not a valid URI: {0}")]
    Uri(#[from] axum::http::uri::InvalidUri),
}

/// Build `{base}/search?query=...&language=...` with proper encoding.
pub fn build_search_uri(base: &str, query: &str, language: &str) -> Result<Uri, SearchUriError> {
    let endpoint = format!("{}/search", base.trim_end_matches('/'));
    let url = Url::parse_with_params(&endpoint, &[("query", query), ("language", language)])?;
    Ok(url.as_str().parse()?)
}
