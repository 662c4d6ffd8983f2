//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [upstream]
            app_address = "127.0.0.1:3001"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.upstream.app_address, "127.0.0.1:3001");
        // Unspecified sections fall back to defaults.
        assert_eq!(config.i18n.fallback, "sk");
        assert_eq!(config.auth.cookie_name, "accessToken");
    }

    #[test]
    fn parses_tenant_rules() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [tenants]
            default_section = "portal"

            [[tenants.rules]]
            subdomain = "jobs"
            section = "internships"
            "#,
        )
        .unwrap();

        assert_eq!(config.tenants.default_section, "portal");
        assert_eq!(config.tenants.rules.len(), 1);
        assert_eq!(config.tenants.rules[0].section, "internships");
    }
}
