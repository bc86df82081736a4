//! # StudyGenie Utilities
//!
//! Small text helpers shared by the gateway and the HTTP layer: masking
//! secrets before they reach logs, bounding log previews, and unwrapping
//! Markdown code fences around model output.

/// Number of leading secret characters that may appear in logs.
const VISIBLE_SECRET_CHARS: usize = 5;

/// Mask a secret for logging, keeping only its first few characters.
///
/// # Examples
///
/// ```
/// use utils::mask_secret;
///
/// assert_eq!(mask_secret("AIzaSyExample"), "AIzaS...");
/// assert_eq!(mask_secret("abc"), "***");
/// ```
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= VISIBLE_SECRET_CHARS {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(VISIBLE_SECRET_CHARS).collect();
    format!("{}...", prefix)
}

/// Truncate `text` to at most `max_chars` characters for log output.
///
/// Never splits a UTF-8 character.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string()
    }
}

/// Strip a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````)
/// from model output.
///
/// # Examples
///
/// ```
/// use utils::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
/// assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
/// ```
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic())
    };

    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}
