//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (fallback language is supported)
//! - Validate value ranges (timeouts > 0)
//! - Detect conflicting tenant rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no supported languages configured")]
    NoLanguages,

    #[error("language `{0}` is not a two-letter lowercase tag")]
    BadLanguageTag(String),

    #[error("fallback language `{0}` is not in the supported set")]
    UnknownFallback(String),

    #[error("path `{0}` must start with `/`")]
    BadPath(String),

    #[error("tenant rule has an empty {0}")]
    EmptyTenantRule(&'static str),

    #[error("duplicate tenant rule for subdomain `{0}`")]
    DuplicateTenantRule(String),

    #[error("upstream timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.i18n.languages.is_empty() {
        errors.push(ValidationError::NoLanguages);
    }
    for lang in &config.i18n.languages {
        if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_lowercase()) {
            errors.push(ValidationError::BadLanguageTag(lang.clone()));
        }
    }
    if !config.i18n.languages.contains(&config.i18n.fallback) {
        errors.push(ValidationError::UnknownFallback(config.i18n.fallback.clone()));
    }

    let mut seen = Vec::new();
    for rule in &config.tenants.rules {
        if rule.subdomain.is_empty() {
            errors.push(ValidationError::EmptyTenantRule("subdomain"));
        }
        if rule.section.is_empty() {
            errors.push(ValidationError::EmptyTenantRule("section"));
        }
        if seen.contains(&rule.subdomain) {
            errors.push(ValidationError::DuplicateTenantRule(rule.subdomain.clone()));
        }
        seen.push(rule.subdomain.clone());
    }

    let path_lists = config
        .tenants
        .shared_paths
        .iter()
        .chain(&config.auth.public_paths)
        .chain(&config.auth.skip_return_paths)
        .chain(&config.i18n.bypass_prefixes)
        .chain(&config.i18n.bypass_paths);
    for path in path_lists {
        if !path.starts_with('/') {
            errors.push(ValidationError::BadPath(path.clone()));
        }
    }
    if !config.auth.login_path.starts_with('/') {
        errors.push(ValidationError::BadPath(config.auth.login_path.clone()));
    }

    if config.upstream.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.upstream.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TenantRule;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn rejects_unknown_fallback() {
        let mut config = GatewayConfig::default();
        config.i18n.fallback = "de".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::UnknownFallback("de".to_string())));
    }

    #[test]
    fn rejects_bad_language_tag() {
        let mut config = GatewayConfig::default();
        config.i18n.languages.push("EN-us".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BadLanguageTag("EN-us".to_string())));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = GatewayConfig::default();
        config.i18n.languages.clear();
        config.upstream.request_secs = 0;
        config.auth.public_paths.push("login".to_string());

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
        assert!(errors.contains(&ValidationError::NoLanguages));
    }

    #[test]
    fn rejects_duplicate_tenant_rules() {
        let mut config = GatewayConfig::default();
        config.tenants.rules.push(TenantRule {
            subdomain: "flawis".to_string(),
            section: "other".to_string(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateTenantRule("flawis".to_string())));
    }
}
