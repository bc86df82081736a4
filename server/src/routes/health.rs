use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response}
};
use serde_json::{Value, json};
use sg_core::{CompletionRequest, CompletionResult};

use crate::prompts::{CONNECTION_TEST_MAX_TOKENS, CONNECTION_TEST_PROMPT};
use crate::state::AppState;

/// `GET /api/health`
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let has_api_key = state.config.upstream.has_api_key();

    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.server.environment,
        "hasApiKey": has_api_key,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": "not_configured",
            "ai": if has_api_key { "configured" } else { "missing_key" },
            "cache": "not_configured"
        }
    }))
}

/// `GET /api/debug`
///
/// Runtime facts for troubleshooting a deployment. Never includes the key
/// itself.
pub async fn debug_handler(State(state): State<AppState>) -> Json<Value> {
    let upstream = &state.config.upstream;

    Json(json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "environment": state.config.server.environment,
        "hasGoogleApiKey": upstream.has_api_key(),
        "apiKeyLength": upstream.api_key().map_or(0, |key| key.chars().count()),
        "model": upstream.model,
        "platform": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `GET /api/test`
///
/// One small completion through the gateway to prove the key works.
pub async fn connection_test_handler(State(state): State<AppState>) -> Response {
    let environment = state.config.server.environment.clone();

    let Some(gateway) = state.gateway.as_deref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("{} environment variable is not set", config::API_KEY_VAR),
                "status": "failed",
                "environment": environment
            }))
        )
            .into_response();
    };

    let request = CompletionRequest::new("", CONNECTION_TEST_PROMPT, CONNECTION_TEST_MAX_TOKENS);
    match gateway.complete(&request).await {
        CompletionResult::Success { text } => Json(json!({
            "message": text,
            "status": "success",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "environment": environment,
            "apiKeyStatus": "Set and working"
        }))
        .into_response(),
        CompletionResult::Failure {
            error_class,
            raw_message
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": raw_message,
                "errorClass": error_class,
                "status": "failed",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "environment": environment,
                "apiKeyStatus": "Set but not working",
                "troubleshooting": {
                    "checkApiKey": "Verify your Google AI API key is valid",
                    "checkQuota": "Check if you have API quota remaining",
                    "checkBilling": "Ensure billing is enabled in Google Cloud Console"
                }
            }))
        )
            .into_response()
    }
}
