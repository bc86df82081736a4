use axum::{
    Json,
    extract::{State, rejection::JsonRejection}
};
use errors::ValidationError;
use serde::Deserialize;
use serde_json::{Value, json};
use sg_core::{ChatTurn, CompletionRequest, validate_content};
use tracing::info;

use crate::errors::{ApiError, ApiResult};
use crate::prompts::{CHAT_MAX_TOKENS, TUTOR_SYSTEM_PROMPT, chat_prompt};
use crate::routes::completion_text;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Kept loose so a non-string message is a validation error rather than
    /// a format error.
    #[serde(default)]
    pub message: Option<Value>,
    /// `null` and a missing key both mean no history.
    #[serde(default)]
    pub history: Option<Vec<ChatTurn>>
}

/// `POST /api/chat`
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatBody>, JsonRejection>
) -> ApiResult<Json<Value>> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidFormat {
        reason: e.body_text()
    })?;

    let message = validate_message(body.message.as_ref(), state.config.server.max_message_chars)?;
    let gateway = state.gateway()?;
    let history = body.history.unwrap_or_default();

    info!(
        chars = message.chars().count(),
        history = history.len(),
        "Chat request received"
    );

    let request = CompletionRequest::new(TUTOR_SYSTEM_PROMPT, chat_prompt(message), CHAT_MAX_TOKENS)
        .with_history(history);
    let text = completion_text(gateway.complete(&request).await)?;

    Ok(Json(json!({
        "response": text,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "status": "success"
    })))
}

fn validate_message(message: Option<&Value>, max_chars: usize) -> ApiResult<&str> {
    let invalid = || ApiError::InvalidInput {
        message: "Please provide a valid question".to_string()
    };

    let message = message.and_then(Value::as_str).ok_or_else(invalid)?;
    validate_content("message", message, max_chars).map_err(|e| match e {
        ValidationError::ContentTooLong { max, .. } => ApiError::InvalidInput {
            message: format!("Question is too long. Please keep it under {} characters.", max)
        },
        _ => invalid()
    })?;

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_must_be_a_string() {
        assert!(validate_message(None, 2000).is_err());
        assert!(validate_message(Some(&json!(42)), 2000).is_err());
        assert!(validate_message(Some(&json!("   ")), 2000).is_err());
        assert_eq!(validate_message(Some(&json!("Why?")), 2000), Ok("Why?"));
    }

    #[test]
    fn test_message_length_limit() {
        let at_limit = json!("a".repeat(2000));
        assert!(validate_message(Some(&at_limit), 2000).is_ok());

        let too_long = json!("a".repeat(2001));
        assert_eq!(
            validate_message(Some(&too_long), 2000),
            Err(ApiError::InvalidInput {
                message: "Question is too long. Please keep it under 2000 characters.".to_string()
            })
        );
    }
}
