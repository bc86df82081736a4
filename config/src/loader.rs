//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `GOOGLE_GENERATIVE_AI_API_KEY`: Upstream credential
//! - `SG_UPSTREAM_*`: Upstream endpoint settings
//! - `SG_*` (gateway): Retry policy settings
//! - `SG_*` (server): HTTP server settings
//! - `SG_LOG_LEVEL`: Logging level

use crate::config::Config;
use std::env;

/// Name of the variable holding the upstream credential.
pub const API_KEY_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";

/// Environment loading error.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String }
}

/// Load configuration from environment variables on top of the defaults.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Builds a [`Config`] from defaults and overrides every field whose
/// variable is set.
///
/// ## Environment Variables
/// ### Upstream
/// - `GOOGLE_GENERATIVE_AI_API_KEY`: API credential (no default)
/// - `SG_UPSTREAM_BASE_URL`: API root
/// - `SG_UPSTREAM_MODEL`: Model name
///
/// ### Gateway
/// - `SG_MAX_ATTEMPTS`, `SG_PRIMARY_ATTEMPTS`
/// - `SG_INITIAL_DELAY_MS`, `SG_MAX_BACKOFF_MS`, `SG_ATTEMPT_TIMEOUT_MS`
///
/// ### Server
/// - `SG_BIND_ADDRESS`, `SG_PORT`
/// - `SG_MAX_MESSAGE_CHARS`, `SG_MAX_DOCUMENT_CHARS`
/// - `SG_ENVIRONMENT`
///
/// ### Observability
/// - `SG_LOG_LEVEL`
pub fn load_from_env() -> Result<Config, EnvError> {
    apply_env(Config::default())
}

/// Override fields of `config` with every environment variable that is set.
pub fn apply_env(mut config: Config) -> Result<Config, EnvError> {
    if let Ok(key) = env::var(API_KEY_VAR) {
        config.upstream.api_key = Some(key);
    }
    if let Ok(url) = env::var("SG_UPSTREAM_BASE_URL") {
        config.upstream.base_url = url;
    }
    if let Ok(model) = env::var("SG_UPSTREAM_MODEL") {
        config.upstream.model = model;
    }

    override_parsed("SG_MAX_ATTEMPTS", &mut config.gateway.max_attempts)?;
    override_parsed("SG_PRIMARY_ATTEMPTS", &mut config.gateway.primary_attempts)?;
    override_parsed("SG_INITIAL_DELAY_MS", &mut config.gateway.initial_delay_ms)?;
    override_parsed("SG_MAX_BACKOFF_MS", &mut config.gateway.max_backoff_ms)?;
    override_parsed(
        "SG_ATTEMPT_TIMEOUT_MS",
        &mut config.gateway.attempt_timeout_ms
    )?;

    if let Ok(addr) = env::var("SG_BIND_ADDRESS") {
        config.server.bind_address = addr;
    }
    override_parsed("SG_PORT", &mut config.server.port)?;
    override_parsed("SG_MAX_MESSAGE_CHARS", &mut config.server.max_message_chars)?;
    override_parsed(
        "SG_MAX_DOCUMENT_CHARS",
        &mut config.server.max_document_chars
    )?;
    if let Ok(environment) = env::var("SG_ENVIRONMENT") {
        config.server.environment = environment;
    }

    if let Ok(level) = env::var("SG_LOG_LEVEL") {
        config.observability.logging_level = level.to_lowercase();
    }

    Ok(config)
}

fn override_parsed<T: std::str::FromStr>(key: &str, target: &mut T) -> Result<(), EnvError> {
    if let Some(value) = parse_env::<T>(key)? {
        *target = value;
    }
    Ok(())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>, EnvError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EnvError::InvalidValue {
                key: key.to_string(),
                value: raw
            }),
        Err(_) => Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        API_KEY_VAR,
        "SG_UPSTREAM_BASE_URL",
        "SG_UPSTREAM_MODEL",
        "SG_MAX_ATTEMPTS",
        "SG_INITIAL_DELAY_MS",
        "SG_PORT",
        "SG_LOG_LEVEL"
    ];

    fn clear_vars() {
        for var in VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_defaults() {
        clear_vars();
        let config = load_from_env().unwrap();
        assert_eq!(config.upstream.api_key, None);
        assert_eq!(config.upstream.model, "gemini-1.5-flash");
        assert_eq!(config.gateway.max_attempts, 4);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.observability.logging_level, "info");
    }

    #[test]
    #[serial]
    fn test_load_from_env_overrides() {
        clear_vars();
        unsafe {
            env::set_var(API_KEY_VAR, "AIzaTestKey");
            env::set_var("SG_UPSTREAM_MODEL", "gemini-2.0-flash");
            env::set_var("SG_MAX_ATTEMPTS", "6");
            env::set_var("SG_PORT", "9999");
            env::set_var("SG_LOG_LEVEL", "DEBUG");
        }

        let config = load_from_env().unwrap();
        clear_vars();

        assert_eq!(config.upstream.api_key.as_deref(), Some("AIzaTestKey"));
        assert_eq!(config.upstream.model, "gemini-2.0-flash");
        assert_eq!(config.gateway.max_attempts, 6);
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.observability.logging_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_rejected() {
        clear_vars();
        unsafe {
            env::set_var("SG_INITIAL_DELAY_MS", "soon");
        }

        let result = load_from_env();
        clear_vars();

        assert!(matches!(
            result,
            Err(EnvError::InvalidValue { ref key, .. }) if key == "SG_INITIAL_DELAY_MS"
        ));
    }

    #[test]
    #[serial]
    fn test_parse_env_missing() {
        clear_vars();
        let result: Option<u32> = parse_env("SG_MAX_ATTEMPTS").unwrap();
        assert!(result.is_none());
    }
}
