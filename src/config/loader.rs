//! Configuration loading from disk.

use std::fmt;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RouterConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single semantic validation failure.
#[derive(Debug)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: RouterConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Semantic validation (serde handles syntactic). Returns all failures,
/// not just the first.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            message: format!("not a valid socket address: {}", config.listener.bind_address),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    let platform = &config.platform;
    for (field, prefix) in [
        ("platform.control_prefix", &platform.control_prefix),
        ("platform.shell_prefix", &platform.shell_prefix),
    ] {
        if !prefix.starts_with('/') {
            errors.push(ValidationError {
                field,
                message: format!("path prefix must start with '/': {prefix}"),
            });
        }
    }

    if let Some(prefix) = &platform.tenant_path_prefix {
        if !prefix.starts_with('/') {
            errors.push(ValidationError {
                field: "platform.tenant_path_prefix",
                message: format!("path prefix must start with '/': {prefix}"),
            });
        }
    }

    if platform.tenant_query_param.is_empty() {
        errors.push(ValidationError {
            field: "platform.tenant_query_param",
            message: "must not be empty".to_string(),
        });
    }

    if platform.sticky_fallback && !platform.dev_mode {
        errors.push(ValidationError {
            field: "platform.sticky_fallback",
            message: "sticky tenant fallback is unsynchronized and only valid in dev_mode".to_string(),
        });
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
    use crate::config::schema::RouterConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&RouterConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_bind_address_and_prefix() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.platform.control_prefix = "control".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "listener.bind_address");
        assert_eq!(errors[1].field, "platform.control_prefix");
    }

    #[test]
    fn sticky_fallback_requires_dev_mode() {
        let mut config = RouterConfig::default();
        config.platform.sticky_fallback = true;
        assert!(validate_config(&config).is_err());

        config.platform.dev_mode = true;
        assert!(validate_config(&config).is_ok());
    }
}
