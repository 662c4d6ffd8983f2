//! Internationalization subsystem.
//!
//! # Responsibilities
//! - Accept-Language negotiation (accept.rs)
//! - Locale-aware path inspection (prefix detection and stripping)
//!
//! # Design Decisions
//! - Locale prefixes are matched as whole path segments, never as raw
//!   string prefixes, so `/sky` is not treated as Slovak
//! - Helpers are pure functions over the configured language set

pub mod accept;

pub use accept::{match_tag, negotiate};

/// First path segment of `path`, without the leading slash.
///
/// Exactly one leading slash is consumed: `/en/foo` → `en`, while `/`
/// and `//en/foo` have an empty first segment.
pub fn first_segment(path: &str) -> &str {
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .next()
        .unwrap_or("")
}

/// Supported locale carried by the path's first segment, if any.
pub fn path_locale<'a>(path: &'a str, languages: &[String]) -> Option<&'a str> {
    let segment = first_segment(path);
    (!segment.is_empty() && languages.iter().any(|lang| lang == segment)).then_some(segment)
}

/// The path with its supported locale prefix removed.
///
/// `/en/login` → `/login`; `/en` → `/`; `/login` is returned unchanged.
pub fn strip_locale_prefix<'a>(path: &'a str, languages: &[String]) -> &'a str {
    match path_locale(path, languages) {
        Some(locale) => {
            let rest = &path[1 + locale.len()..];
            if rest.is_empty() {
                "/"
            } else {
                rest
            }
        }
        None => path,
    }
}

/// True when the first segment looks like a two-letter language code,
/// supported or not.
pub fn looks_like_locale_segment(path: &str) -> bool {
    let segment = first_segment(path);
    segment.len() == 2 && segment.chars().all(|c| c.is_ascii_alphabetic())
}
