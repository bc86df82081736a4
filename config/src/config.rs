//! # Configuration Structures
//!
//! This module defines all configuration structures for the StudyGenie
//! gateway.
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation
//! - Fall back to the documented defaults for every missing field

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main configuration structure for the StudyGenie gateway.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Aggregates the upstream client, retry policy, HTTP server and logging
/// settings into one validated structure.
///
/// ## Usage
/// ```rust,no_run
/// use config::Config;
///
/// let config = Config::default();
/// println!("Model: {}", config.upstream.model);
/// ```
///
/// ## Fields
/// - `upstream`: Generation API endpoint, model and credential
/// - `gateway`: Attempt count, backoff and per-attempt timeout
/// - `server`: Bind address and input size limits
/// - `observability`: Logging level
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    #[validate(nested)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    #[validate(nested)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    #[serde(default)]
    #[validate(nested)]
    pub observability: ObservabilityConfig
}

/// Upstream generation API configuration.
///
/// ## Fields
/// - `api_key`: Credential for the generation API. Never serialized and
///   masked in `Debug` output.
/// - `base_url`: API root (default: "https://generativelanguage.googleapis.com/v1beta")
/// - `model`: Model name (default: "gemini-1.5-flash")
#[derive(Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct UpstreamConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,

    #[serde(default = "default_model")]
    #[validate(length(min = 1, max = 128))]
    pub model: String
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

impl UpstreamConfig {
    /// Returns the credential when it is present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model()
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &self.api_key().map(utils::mask_secret))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Retry policy configuration for the completion gateway.
///
/// # M-CANONICAL-DOCS
///
/// ## Fields
/// - `max_attempts`: Total attempts per request (default: 4, range: 1-10)
/// - `primary_attempts`: Leading attempts served by the primary strategy
///   (default: 2)
/// - `initial_delay_ms`: Backoff before the second attempt (default: 1500)
/// - `max_backoff_ms`: Cap of the exponential schedule (default: 10000)
/// - `rate_limit_multiplier`: Multiplier of `max_backoff_ms` applied after a
///   rate-limited attempt (default: 1.5)
/// - `jitter_factor`: Upper bound of the random jitter as a fraction of the
///   base delay (default: 0.1)
/// - `attempt_timeout_ms`: Deadline of a single attempt (default: 30000)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct GatewayConfig {
    #[serde(default = "default_max_attempts")]
    #[validate(range(min = 1, max = 10))]
    pub max_attempts: u32,

    #[serde(default = "default_primary_attempts")]
    #[validate(range(min = 0, max = 10))]
    pub primary_attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    #[validate(range(min = 1, max = 60000))]
    pub initial_delay_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    #[validate(range(min = 1, max = 120000))]
    pub max_backoff_ms: u64,

    #[serde(default = "default_rate_limit_multiplier")]
    #[validate(range(min = 1.0, max = 10.0))]
    pub rate_limit_multiplier: f64,

    #[serde(default = "default_jitter_factor")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub jitter_factor: f64,

    #[serde(default = "default_attempt_timeout_ms")]
    #[validate(range(min = 100, max = 300000))]
    pub attempt_timeout_ms: u64
}

fn default_max_attempts() -> u32 {
    4
}

fn default_primary_attempts() -> u32 {
    2
}

fn default_initial_delay_ms() -> u64 {
    1500
}

fn default_max_backoff_ms() -> u64 {
    10000
}

fn default_rate_limit_multiplier() -> f64 {
    1.5
}

fn default_jitter_factor() -> f64 {
    0.1
}

fn default_attempt_timeout_ms() -> u64 {
    30000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            primary_attempts: default_primary_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit_multiplier: default_rate_limit_multiplier(),
            jitter_factor: default_jitter_factor(),
            attempt_timeout_ms: default_attempt_timeout_ms()
        }
    }
}

/// HTTP server configuration.
///
/// ## Fields
/// - `bind_address`: Listen address (default: "0.0.0.0")
/// - `port`: Listen port (default: 3000)
/// - `max_message_chars`: Longest accepted chat message (default: 2000)
/// - `max_document_chars`: Longest accepted summarize/quiz text
///   (default: 100000)
/// - `environment`: Free-form deployment label reported by `/api/health`
///   (default: "development")
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    #[validate(length(min = 1, max = 255))]
    pub bind_address: String,

    #[serde(default = "default_port")]
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    #[serde(default = "default_max_message_chars")]
    #[validate(range(min = 1, max = 100000))]
    pub max_message_chars: usize,

    #[serde(default = "default_max_document_chars")]
    #[validate(range(min = 1, max = 10000000))]
    pub max_document_chars: usize,

    #[serde(default = "default_environment")]
    #[validate(length(min = 1, max = 64))]
    pub environment: String
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_message_chars() -> usize {
    2000
}

fn default_max_document_chars() -> usize {
    100000
}

fn default_environment() -> String {
    "development".to_string()
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind_address, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_message_chars: default_max_message_chars(),
            max_document_chars: default_max_document_chars(),
            environment: default_environment()
        }
    }
}

/// Observability configuration.
///
/// ## Fields
/// - `logging_level`: Default `tracing` filter directive when `RUST_LOG` is
///   unset (trace/debug/info/warn/error, default: "info")
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObservabilityConfig {
    #[serde(default = "default_logging_level")]
    #[validate(custom(function = "validate_logging_level"))]
    pub logging_level: String
}

fn default_logging_level() -> String {
    "info".to_string()
}

fn validate_logging_level(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid logging level"))
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging_level: default_logging_level()
        }
    }
}
