//! Response construction and transformation.
//!
//! # Responsibilities
//! - Build redirect responses for pipeline decisions
//! - Strip hop-by-hop headers from relayed upstream responses
//! - Map upstream failures to gateway status codes
//!
//! # Design Decisions
//! - Redirects use 307 so the client preserves the request method
//! - Upstream connect/transfer failures surface as 502 Bad Gateway
//! - Streaming responses are relayed without buffering

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Hop-by-hop headers that must not be relayed (RFC 9110 §7.6.1).
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Build a 307 redirect carrying any Set-Cookie values the pipeline
/// accumulated.
pub fn redirect(location: &str, cookies: &[String]) -> Response {
    let Ok(location) = HeaderValue::from_str(location) else {
        tracing::error!(location = %location, "Redirect location is not a valid header value");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid redirect target").into_response();
    };

    let mut response = Response::builder()
        .status(StatusCode::TEMPORARY_REDIRECT)
        .header(header::LOCATION, location)
        .body(Body::empty())
        // Infallible: status and header are known-valid at this point.
        .unwrap_or_default();

    append_cookies(response.headers_mut(), cookies);
    response
}

/// Append pipeline cookies to a response header map.
pub fn append_cookies(headers: &mut HeaderMap, cookies: &[String]) {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            Err(_) => {
                tracing::warn!(cookie = %cookie, "Dropping invalid Set-Cookie value");
            }
        }
    }
}

/// Remove hop-by-hop headers before relaying an upstream response.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// 502 response for a failed upstream exchange.
pub fn bad_gateway(detail: &'static str) -> Response {
    (StatusCode::BAD_GATEWAY, detail).into_response()
}
