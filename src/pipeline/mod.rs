//! Per-request resolution pipeline.
//!
//! # Data Flow
//! ```text
//! incoming request
//!     → RequestContext (host, path, query, cookies)
//!     → locale stage  (redirect, or rewrite path to /{lng}/...)
//!     → tenant stage  (rewrite path to /{lng}/{section}/...)
//!     → auth stage    (redirect to login / away from public-only paths)
//!     → forwarder (proxy rewritten request upstream)
//! ```
//!
//! # Design Decisions
//! - Stages are pure functions over RequestContext; the first Redirect
//!   short-circuits the chain
//! - Redirects are returned as data (location + cookies), not responses,
//!   so stages stay testable without an HTTP stack
//! - Set-Cookie values accumulate across stages and are attached to the
//!   relayed upstream response

use std::collections::HashMap;

use axum::http::HeaderMap;

use crate::config::{GatewayConfig, I18nConfig};
use crate::http::request::parse_cookies;

pub mod auth;
pub mod locale;
pub mod tenant;

/// Mutable per-request state threaded through the stages.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Host header value, verbatim (may include a port).
    pub host: Option<String>,

    /// Path as the client sent it. Redirect destinations derive from this,
    /// never from the rewritten path.
    pub original_path: String,

    /// Raw query string, without the leading `?`.
    pub query: Option<String>,

    /// Parsed request cookies (first occurrence wins).
    pub cookies: HashMap<String, String>,

    /// Referer header, if present.
    pub referer: Option<String>,

    /// Accept-Language header, if present.
    pub accept_language: Option<String>,

    /// Current path; stages rewrite this in place.
    pub path: String,

    /// Locale resolved by the locale stage.
    pub locale: Option<String>,

    /// Set-Cookie values to attach to the final response.
    pub set_cookies: Vec<String>,
}

impl RequestContext {
    /// Build a context from request headers and URI components.
    pub fn new(headers: &HeaderMap, path: &str, query: Option<&str>) -> Self {
        let header_str =
            |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);

        let path = if path.is_empty() { "/".to_string() } else { path.to_string() };

        Self {
            host: header_str("host"),
            original_path: path.clone(),
            query: query.map(str::to_string),
            cookies: parse_cookies(headers),
            referer: header_str("referer"),
            accept_language: header_str("accept-language"),
            path,
            locale: None,
            set_cookies: Vec::new(),
        }
    }

    /// Current path plus the original query string, for redirect targets.
    pub fn with_query(&self, path: String) -> String {
        match &self.query {
            Some(q) if !q.is_empty() => format!("{path}?{q}"),
            _ => path,
        }
    }
}

/// Outcome of a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Hand the (possibly rewritten) request to the next stage.
    Continue,

    /// Short-circuit with a client redirect.
    Redirect {
        location: String,
        cookies: Vec<String>,
    },
}

/// Run the full stage chain: locale → tenant → auth.
pub fn run(ctx: &mut RequestContext, config: &GatewayConfig) -> Decision {
    for stage in [locale::apply, tenant::apply, auth::apply] {
        if let Decision::Redirect { location, cookies } = stage(ctx, config) {
            return Decision::Redirect { location, cookies };
        }
    }
    Decision::Continue
}

/// True when the path is exempt from the pipeline entirely (static assets,
/// framework internals, API routes).
pub fn is_bypassed(path: &str, i18n: &I18nConfig) -> bool {
    i18n.bypass_paths.iter().any(|p| p == path)
        || i18n.bypass_prefixes.iter().any(|p| path.starts_with(p.as_str()))
        || i18n.bypass_suffixes.iter().any(|s| path.ends_with(s.as_str()))
}
