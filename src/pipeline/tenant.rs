//! Tenant resolution stage.
//!
//! # Responsibilities
//! - Select a tenant section from the Host header's subdomain
//! - Rewrite the path to `/{lng}/{section}/...`
//! - Leave shared paths (login, logout, invoices, ...) untouched
//!
//! # Design Decisions
//! - Subdomain matching is substring-based, so `conferences-staging`
//!   still routes to the conferences section
//! - Hosts matching no rule fall back to the configured default section;
//!   an empty default disables the rewrite entirely

use crate::config::GatewayConfig;
use crate::i18n;
use crate::pipeline::{Decision, RequestContext};

/// First label of the host, with any port stripped.
fn subdomain(host: &str) -> &str {
    let without_port = host.split(':').next().unwrap_or(host);
    without_port.split('.').next().unwrap_or(without_port)
}

/// Apply the tenant stage to the request.
pub fn apply(ctx: &mut RequestContext, config: &GatewayConfig) -> Decision {
    let tenants = &config.tenants;
    let languages = &config.i18n.languages;

    let without_locale = i18n::strip_locale_prefix(&ctx.path, languages).to_string();
    if tenants.shared_paths.iter().any(|p| *p == without_locale) {
        return Decision::Continue;
    }

    // Hostnames are case-insensitive per HTTP spec.
    let label = ctx
        .host
        .as_deref()
        .map(subdomain)
        .unwrap_or("")
        .to_ascii_lowercase();
    let section = tenants
        .rules
        .iter()
        .find(|rule| label.contains(&rule.subdomain))
        .map(|rule| rule.section.as_str())
        .or_else(|| (!tenants.default_section.is_empty()).then_some(tenants.default_section.as_str()));

    let Some(section) = section else {
        return Decision::Continue;
    };

    let locale = ctx
        .locale
        .clone()
        .or_else(|| i18n::path_locale(&ctx.path, languages).map(str::to_string))
        .unwrap_or_else(|| config.i18n.fallback.clone());

    let rest = without_locale.trim_start_matches('/');
    ctx.path = format!("/{locale}/{section}/{rest}");

    tracing::debug!(
        subdomain = %label,
        section = %section,
        path = %ctx.path,
        "Tenant rewrite"
    );

    Decision::Continue
}
