//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check the proxy upstream is a usable absolute URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::proxy::ProxyTarget;

/// Accepted values for `logging.level`.
pub const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid port number: {0}")]
    InvalidPort(u16),

    #[error("static directory cannot be empty")]
    EmptyStaticDirectory,

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("invalid proxy upstream {url:?}: {reason}")]
    InvalidUpstream { url: String, reason: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::InvalidPort(config.listener.port));
    }

    if config.static_files.directory.trim().is_empty() {
        errors.push(ValidationError::EmptyStaticDirectory);
    }

    if !LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.logging.level.clone()));
    }

    let timeouts = [
        ("read_timeout_secs", config.listener.read_timeout_secs),
        ("write_timeout_secs", config.listener.write_timeout_secs),
        ("idle_timeout_secs", config.listener.idle_timeout_secs),
        ("shutdown_grace_secs", config.listener.shutdown_grace_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    // Same parser the forwarder is built with, so the rules cannot drift.
    if let Err(e) = ProxyTarget::parse(&config.proxy.upstream) {
        errors.push(ValidationError::InvalidUpstream {
            url: config.proxy.upstream.clone(),
            reason: e.to_string(),
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

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn port_zero_rejected() {
        let mut config = AppConfig::default();
        config.listener.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidPort(0)]);
    }

    #[test]
    fn empty_static_directory_rejected() {
        let mut config = AppConfig::default();
        config.static_files.directory = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyStaticDirectory]);
    }

    #[test]
    fn invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidLogLevel("invalid".into())]);
    }

    #[test]
    fn all_errors_reported() {
        let mut config = AppConfig::default();
        config.listener.port = 0;
        config.listener.write_timeout_secs = 0;
        config.proxy.upstream = "https://tasks.internal".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::ZeroTimeout("write_timeout_secs")));
    }

    fn upstream_errors(upstream: &str) -> Vec<ValidationError> {
        let mut config = AppConfig::default();
        config.proxy.upstream = upstream.into();
        validate_config(&config).err().unwrap_or_default()
    }

    #[test]
    fn upstream_must_be_absolute_http() {
        assert!(upstream_errors("http://127.0.0.1:8081").is_empty());
        assert!(upstream_errors("http://tasks").is_empty());
        for bad in ["127.0.0.1:8081", "/api/tasks", "https://tasks"] {
            let errors = upstream_errors(bad);
            assert!(
                matches!(errors.as_slice(), [ValidationError::InvalidUpstream { url, .. }] if url == bad),
                "{bad}: {errors:?}"
            );
        }
    }

    #[test]
    fn accepted_upstreams_always_build_a_target() {
        for upstream in ["http://127.0.0.1:8081", "http://tasks", "http://[::1]:9000/ignored"] {
            assert!(upstream_errors(upstream).is_empty(), "{upstream}");
            assert!(ProxyTarget::parse(upstream).is_ok(), "{upstream}");
        }
    }
}
