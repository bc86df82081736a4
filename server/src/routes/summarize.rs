use axum::{
    Json,
    extract::{Request, State}
};
use serde_json::{Value, json};
use sg_core::CompletionRequest;
use tracing::info;

use crate::errors::ApiResult;
use crate::prompts::{SUMMARIZER_SYSTEM_PROMPT, SUMMARY_MAX_TOKENS, summary_prompt};
use crate::routes::{completion_text, load_document};
use crate::state::AppState;

/// `POST /api/summarize`
pub async fn summarize_handler(
    State(state): State<AppState>,
    request: Request
) -> ApiResult<Json<Value>> {
    let gateway = state.gateway()?;
    let content = load_document(&state, request).await?;

    info!(chars = content.chars().count(), "Summarizing content");

    let request = CompletionRequest::new(
        SUMMARIZER_SYSTEM_PROMPT,
        summary_prompt(&content),
        SUMMARY_MAX_TOKENS
    );
    let summary = completion_text(gateway.complete(&request).await)?;

    Ok(Json(json!({ "summary": summary })))
}
