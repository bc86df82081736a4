pub mod chat;
pub mod health;
pub mod quiz;
pub mod summarize;

use axum::{Json, extract::Request, http::StatusCode};
use serde_json::{Value, json};
use errors::ValidationError;
use sg_core::{CompletionResult, validate_content};

use crate::errors::{ApiError, ApiResult};
use crate::extract;
use crate::state::AppState;

/// Success text of a completion, or the classified failure as an API error.
pub(crate) fn completion_text(result: CompletionResult) -> ApiResult<String> {
    match result {
        CompletionResult::Success { text } => Ok(text),
        CompletionResult::Failure {
            error_class,
            raw_message
        } => Err(ApiError::Completion {
            error_class,
            raw_message
        })
    }
}

/// Fallback for unknown `/api/*` paths, so they still pass through the API
/// middleware.
pub async fn not_found_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Read, extract and bound the study material of a summarize/quiz request.
pub(crate) async fn load_document(state: &AppState, request: Request) -> ApiResult<String> {
    let source = extract::read_source(request).await?;
    let text = extract::resolve_text(source, state.extractor.clone()).await?;

    validate_content("text", &text, state.config.server.max_document_chars).map_err(
        |e| match e {
            ValidationError::ContentTooLong { max, .. } => ApiError::InvalidInput {
                message: format!("Content is too long. Please keep it under {} characters.", max)
            },
            ValidationError::EmptyContent { .. } => ApiError::NoContent,
            ValidationError::InvalidFormat { reason } => ApiError::InvalidFormat { reason }
        }
    )?;

    Ok(text)
}
