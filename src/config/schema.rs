//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream application and search service settings.
    pub upstream: UpstreamConfig,

    /// Internationalization settings (languages, locale cookie, bypass paths).
    pub i18n: I18nConfig,

    /// Tenant resolution settings (subdomain rules, shared paths).
    pub tenants: TenantConfig,

    /// Authentication gate settings.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream services the gateway forwards to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Application backend address (e.g., "127.0.0.1:3000").
    /// Rewritten requests are forwarded here.
    pub app_address: String,

    /// Base URL of the search/embedding service.
    pub search_base_url: String,

    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            app_address: "127.0.0.1:3000".to_string(),
            search_base_url: "http://vector-embed:8000".to_string(),
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Internationalization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Supported language tags (two-letter, lowercase).
    pub languages: Vec<String>,

    /// Fallback language. Must be one of `languages`. The fallback is never
    /// shown in URLs; requests carrying it are redirected to the bare path.
    pub fallback: String,

    /// Name of the locale cookie.
    pub cookie_name: String,

    /// Domain attribute for the locale cookie (e.g., ".flaw.uniba.sk").
    pub cookie_domain: String,

    /// Path prefixes exempt from the request pipeline (assets, API).
    pub bypass_prefixes: Vec<String>,

    /// Exact paths exempt from the request pipeline.
    pub bypass_paths: Vec<String>,

    /// Path suffixes exempt from the request pipeline (e.g., ".pdf").
    pub bypass_suffixes: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            languages: vec!["sk".to_string(), "en".to_string()],
            fallback: "sk".to_string(),
            cookie_name: "NEXT_locale".to_string(),
            cookie_domain: "localhost".to_string(),
            bypass_prefixes: vec![
                "/api".to_string(),
                "/_next".to_string(),
                "/images".to_string(),
                "/UKsans".to_string(),
            ],
            bypass_paths: vec![
                "/favicon.ico".to_string(),
                "/site.webmanifest".to_string(),
                "/browserconfig.xml".to_string(),
                "/sw.js".to_string(),
            ],
            bypass_suffixes: vec![".pdf".to_string()],
        }
    }
}

/// A single subdomain-to-section rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TenantRule {
    /// Substring matched against the host's first label.
    pub subdomain: String,

    /// Section the path is rewritten into (e.g., "internships").
    pub section: String,
}

/// Tenant resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TenantConfig {
    /// Section used when no rule matches (local development, apex domain).
    /// Empty string disables the default rewrite.
    pub default_section: String,

    /// Subdomain rules, checked in order.
    pub rules: Vec<TenantRule>,

    /// Paths (without locale prefix) served identically by all tenants.
    pub shared_paths: Vec<String>,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            default_section: "conferences".to_string(),
            rules: vec![
                TenantRule {
                    subdomain: "flawis".to_string(),
                    section: "flawis".to_string(),
                },
                TenantRule {
                    subdomain: "conferences".to_string(),
                    section: "conferences".to_string(),
                },
                TenantRule {
                    subdomain: "intern".to_string(),
                    section: "internships".to_string(),
                },
            ],
            shared_paths: vec![
                "/logout".to_string(),
                "/login".to_string(),
                "/register".to_string(),
                "/forgotPassword".to_string(),
                "/resetPassword".to_string(),
                "/activate".to_string(),
                "/minio".to_string(),
                "/google/callback".to_string(),
                "/invoice".to_string(),
            ],
        }
    }
}

/// Authentication gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Enable the auth gate.
    pub enabled: bool,

    /// Name of the session token cookie.
    pub cookie_name: String,

    /// Login page path unauthenticated requests are redirected to.
    pub login_path: String,

    /// Paths (without locale prefix) reachable only without a session.
    /// Authenticated requests hitting these are bounced back.
    pub public_paths: Vec<String>,

    /// Paths never recorded as a post-login destination.
    pub skip_return_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cookie_name: "accessToken".to_string(),
            login_path: "/login".to_string(),
            public_paths: vec![
                "/login".to_string(),
                "/register".to_string(),
                "/forgotPassword".to_string(),
                "/resetPassword".to_string(),
                "/google/callback".to_string(),
            ],
            skip_return_paths: vec!["/".to_string(), "/logout".to_string()],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
