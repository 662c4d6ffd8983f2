//! Request inspection helpers.
//!
//! # Responsibilities
//! - Parse the Cookie header into name/value pairs
//! - Expose the request ID header name and lookup
//!
//! # Design Decisions
//! - Request ID is generated as early as possible (request-id layer) and
//!   propagated to upstream requests for correlation
//! - Cookie parsing is tolerant: malformed pairs are skipped, the first
//!   occurrence of a name wins

use std::collections::HashMap;

use axum::http::HeaderMap;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// The request's correlation ID. Generated locally when the request-id
/// layer did not run (direct handler tests, internal requests).
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Parse all Cookie headers into a name → value map.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    let mut cookies = HashMap::new();

    for header in headers.get_all("cookie") {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            cookies
                .entry(name.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }

    cookies
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookie: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert("cookie", cookie.parse().unwrap());
        map
    }

    #[test]
    fn parses_multiple_pairs() {
        let cookies = parse_cookies(&headers("NEXT_locale=en; accessToken=abc123"));

        assert_eq!(cookies.get("NEXT_locale").map(String::as_str), Some("en"));
        assert_eq!(cookies.get("accessToken").map(String::as_str), Some("abc123"));
    }

    #[test]
    fn first_occurrence_wins() {
        let cookies = parse_cookies(&headers("a=1; a=2"));
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
    }

    #[test]
    fn skips_malformed_pairs() {
        let cookies = parse_cookies(&headers("garbage; =nope; ok=yes"));

        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("ok").map(String::as_str), Some("yes"));
    }

    #[test]
    fn empty_value_is_preserved() {
        let cookies = parse_cookies(&headers("accessToken="));
        assert_eq!(cookies.get("accessToken").map(String::as_str), Some(""));
    }

    #[test]
    fn no_cookie_header_yields_empty_map() {
        assert!(parse_cookies(&HeaderMap::new()).is_empty());
    }
}
