//! Accept-Language header negotiation.
//!
//! # Responsibilities
//! - Parse `Accept-Language` entries with optional q-weights
//! - Match primary subtags against the supported language set
//! - Return the highest-weighted supported language
//!
//! # Design Decisions
//! - Matching is on the primary subtag only ("en-US" matches "en")
//! - Unparsable q-values demote the entry to weight 0 rather than erroring
//! - `*` matches the fallback language

/// A single parsed `Accept-Language` entry.
#[derive(Debug, Clone, PartialEq)]
struct LanguageRange {
    tag: String,
    weight: f32,
}

fn parse_entry(entry: &str) -> Option<LanguageRange> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut weight = 1.0_f32;
    for param in parts {
        let param = param.trim();
        if let Some(q) = param.strip_prefix("q=").or_else(|| param.strip_prefix("Q=")) {
            weight = q.trim().parse().unwrap_or(0.0);
        }
    }

    Some(LanguageRange {
        tag: tag.to_ascii_lowercase(),
        weight,
    })
}

/// Match a single language tag against the supported set.
///
/// Comparison is case-insensitive on the primary subtag, so `en-US` and
/// `EN` both resolve to a supported `en`.
pub fn match_tag(tag: &str, supported: &[String]) -> Option<String> {
    let primary = tag.split(['-', '_']).next()?.to_ascii_lowercase();
    supported.iter().find(|lang| **lang == primary).cloned()
}

/// Negotiate the best supported language for an `Accept-Language` header.
///
/// Returns `None` when nothing in the header matches the supported set.
pub fn negotiate(header: &str, supported: &[String], fallback: &str) -> Option<String> {
    let mut ranges: Vec<LanguageRange> = header.split(',').filter_map(parse_entry).collect();

    // Stable sort keeps header order for equal weights.
    ranges.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(std::cmp::Ordering::Equal));

    for range in ranges {
        if range.weight <= 0.0 {
            continue;
        }
        if range.tag == "*" {
            return Some(fallback.to_string());
        }
        if let Some(lang) = match_tag(&range.tag, supported) {
            return Some(lang);
        }
    }

    None
}
