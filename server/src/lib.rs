//! # StudyGenie Server
//!
//! axum front end of the completion gateway. Every endpoint lives under
//! `/api`:
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /api/chat` | tutoring conversation |
//! | `POST /api/summarize` | summary of text or a PDF |
//! | `POST /api/generate-quiz` | multiple-choice quiz from text or a PDF |
//! | `GET /api/health` | liveness and configuration summary |
//! | `GET /api/debug` | non-secret runtime facts |
//! | `GET /api/test` | one-shot upstream connection test |

pub mod errors;
pub mod extract;
pub mod middleware;
pub mod prompts;
pub mod quiz;
pub mod routes;
pub mod state;

pub use crate::errors::{ApiError, ApiResult};
pub use extract::{LopdfExtractor, TextExtractor};
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post}
};
use tower_http::trace::TraceLayer;

/// Largest accepted request body, PDF uploads included.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/chat", post(routes::chat::chat_handler))
        .route("/summarize", post(routes::summarize::summarize_handler))
        .route("/generate-quiz", post(routes::quiz::generate_quiz_handler))
        .route("/health", get(routes::health::health_handler))
        .route("/debug", get(routes::health::debug_handler))
        .route("/test", get(routes::health::connection_test_handler))
        .fallback(routes::not_found_handler)
        .layer(middleware::cors_layer())
        .layer(axum::middleware::from_fn(middleware::api_headers));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
