//! # Configuration Validation
//!
//! Provides validation for all configuration structures using the `validator` crate.

use crate::config::Config;
use validator::Validate;

/// Validate configuration structure.
///
/// # M-CANONICAL-DOCS
///
/// ## Validation Rules
/// ### Upstream
/// - `base_url`: must be a URL
/// - `model`: 1-128 characters
///
/// ### Gateway
/// - `max_attempts`: 1-10
/// - `primary_attempts`: 0-10
/// - `initial_delay_ms`: 1-60000
/// - `max_backoff_ms`: 1-120000
/// - `rate_limit_multiplier`: 1.0-10.0
/// - `jitter_factor`: 0.0-1.0
/// - `attempt_timeout_ms`: 100-300000
///
/// ### Server
/// - `port`: 1-65535
/// - `max_message_chars`: 1-100000
///
/// ### Observability
/// - `logging_level`: must be "trace", "debug", "info", "warn", or "error"
pub fn validate(config: &Config) -> Result<(), validator::ValidationErrors> {
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_validate_invalid_base_url() {
        let mut config = Config::default();
        config.upstream.base_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_jitter() {
        let mut config = Config::default();
        config.gateway.jitter_factor = 1.5;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_logging_level() {
        let mut config = Config::default();
        config.observability.logging_level = "verbose".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(validate(&config).is_err());
    }
}
