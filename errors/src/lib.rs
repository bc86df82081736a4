//! # StudyGenie Errors
//!
//! Structured error definitions shared by the gateway and the HTTP layer.
//!
//! - Uses `thiserror` for structured error definitions
//! - Every variant carries named fields so messages stay readable
//! - Messages of [`StrategyError`] are what the gateway classifier inspects,
//!   so they are worded to match exactly one classification rule

use thiserror::Error;

/// Failure of a single attempt against the upstream generation capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StrategyError {
    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// The per-attempt deadline elapsed before the upstream answered.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The upstream refused to answer because of its safety settings.
    #[error("content blocked by safety policy: {reason}")]
    ContentBlocked { reason: String },

    #[error("upstream response contained no text")]
    EmptyResponse,

    #[error("malformed upstream payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("api key is not configured")]
    MissingCredential
}

impl StrategyError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StrategyError::Timeout { .. })
    }
}

/// Input rejected before any upstream call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyContent { field: String },

    #[error("{field} too long: {length} characters max {max}")]
    ContentTooLong {
        field: String,
        length: usize,
        max: usize
    },

    #[error("Invalid request format: {reason}")]
    InvalidFormat { reason: String }
}

/// Failure of the black-box document text extractor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Document could not be read: {reason}")]
    Unreadable { reason: String },

    #[error("Document contains no readable text")]
    NoText
}
