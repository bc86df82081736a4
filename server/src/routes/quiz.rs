use axum::{
    Json,
    extract::{Request, State}
};
use serde_json::{Value, json};
use sg_core::CompletionRequest;
use tracing::info;

use crate::errors::ApiResult;
use crate::prompts::{QUIZ_MAX_TOKENS, QUIZ_SYSTEM_PROMPT, quiz_prompt};
use crate::quiz::questions_or_fallback;
use crate::routes::{completion_text, load_document};
use crate::state::AppState;

/// `POST /api/generate-quiz`
///
/// Unusable model output is answered with the fallback questions, not an
/// error.
pub async fn generate_quiz_handler(
    State(state): State<AppState>,
    request: Request
) -> ApiResult<Json<Value>> {
    let gateway = state.gateway()?;
    let content = load_document(&state, request).await?;

    info!(chars = content.chars().count(), "Generating quiz");

    let request = CompletionRequest::new(QUIZ_SYSTEM_PROMPT, quiz_prompt(&content), QUIZ_MAX_TOKENS);
    let raw = completion_text(gateway.complete(&request).await)?;

    Ok(Json(json!({ "questions": questions_or_fallback(&raw) })))
}
