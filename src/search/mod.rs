//! Streaming search passthrough.
//!
//! # Responsibilities
//! - Accept `/search?query=...&language=...` from clients
//! - Forward the query to the external search/embedding service
//! - Relay the response body chunk-by-chunk as it arrives
//!
//! # Design Decisions
//! - No buffering, reordering, or retry: chunks flow through as decoded,
//!   failures are logged and surfaced as 502
//! - Language defaults to the request's resolved locale when the client
//!   does not pass one

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::StreamExt;
use http_body_util::BodyStream;
use serde::Deserialize;

use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::i18n;
use crate::pipeline::{locale, RequestContext};

pub mod client;

/// Query parameters for the search passthrough.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub language: Option<String>,
}

/// GET /search: stream results from the search service.
pub async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let config = state.config.load_full();
    let request_id = request_id(&headers);

    let query = params.query.trim();
    if query.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing query parameter").into_response();
    }

    // Explicit language parameter first, then the usual locale resolution.
    let language = params
        .language
        .as_deref()
        .and_then(|lang| i18n::match_tag(lang, &config.i18n.languages))
        .unwrap_or_else(|| {
            let ctx = RequestContext::new(&headers, "/", None);
            locale::resolve(&ctx, &config.i18n)
        });

    let uri = match client::build_search_uri(&config.upstream.search_base_url, query, &language) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build search URI");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid search upstream").into_response();
        }
    };

    tracing::debug!(request_id = %request_id, uri = %uri, "Search passthrough");

    let upstream_request = match Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
    {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to build search request");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid search request").into_response();
        }
    };

    match state.client.request(upstream_request).await {
        Ok(upstream_response) if upstream_response.status().is_success() => {
            let (mut parts, body) = upstream_response.into_parts();
            response::strip_hop_by_hop(&mut parts.headers);

            // Relay data frames as they arrive; decode errors end the stream.
            let request_id_for_stream = request_id.clone();
            let stream = BodyStream::new(body).filter_map(move |frame| {
                let request_id = request_id_for_stream.clone();
                async move {
                    match frame {
                        Ok(frame) => frame.into_data().ok().map(|data: Bytes| {
                            tracing::trace!(request_id = %request_id, bytes = data.len(), "Search chunk relayed");
                            Ok::<_, std::io::Error>(data)
                        }),
                        Err(e) => {
                            tracing::error!(request_id = %request_id, error = %e, "Search stream failed");
                            Some(Err(std::io::Error::other(e)))
                        }
                    }
                }
            });

            Response::from_parts(parts, Body::from_stream(stream))
        }
        Ok(upstream_response) => {
            tracing::error!(
                request_id = %request_id,
                status = %upstream_response.status(),
                "Search service returned an error"
            );
            response::bad_gateway("Search service error")
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Search service unreachable");
            response::bad_gateway("Search service unreachable")
        }
    }
}
