//! Maps raw failure messages onto the caller-facing [`ErrorClass`] taxonomy.

use errors::StrategyError;
use sg_core::ErrorClass;

/// Classify a raw failure message.
///
/// Rules are checked in order against the lower-cased message and the first
/// match wins:
///
/// 1. `quota`, `limit`, `rate` or `429` → [`ErrorClass::RateLimited`]
/// 2. `api key`, `authentication` or `auth` → [`ErrorClass::AuthFailure`]
/// 3. `timeout` or `timed out` → [`ErrorClass::Timeout`]
/// 4. `content` together with `filter`, `block` or `policy` →
///    [`ErrorClass::ContentFiltered`]
/// 5. anything else → [`ErrorClass::Unknown`]
pub fn classify(message: &str) -> ErrorClass {
    let message = message.to_lowercase();
    let contains_any = |needles: &[&str]| needles.iter().any(|n| message.contains(n));

    if contains_any(&["quota", "limit", "rate", "429"]) {
        ErrorClass::RateLimited
    } else if contains_any(&["api key", "authentication", "auth"]) {
        ErrorClass::AuthFailure
    } else if contains_any(&["timeout", "timed out"]) {
        ErrorClass::Timeout
    } else if message.contains("content") && contains_any(&["filter", "block", "policy"]) {
        ErrorClass::ContentFiltered
    } else {
        ErrorClass::Unknown
    }
}

/// Classify a strategy failure.
///
/// Deadline expiry is a [`ErrorClass::Timeout`] regardless of wording; every
/// other failure goes through [`classify`].
pub fn classify_error(error: &StrategyError) -> ErrorClass {
    if error.is_timeout() {
        return ErrorClass::Timeout;
    }
    classify(&error.to_string())
}
