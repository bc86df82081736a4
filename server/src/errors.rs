use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response}
};
use errors::ExtractionError;
use serde_json::json;
use sg_core::ErrorClass;
use thiserror::Error;

/// Every failure an endpoint can answer with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid request format: {reason}")]
    InvalidFormat { reason: String },

    /// Input failed validation; `message` is shown to the student as is.
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("No content provided")]
    NoContent,

    #[error("The uploaded PDF is empty or contains no readable text.")]
    EmptyDocument,

    #[error("Failed to read PDF content. Ensure it's not an image-based file.")]
    UnreadableDocument { reason: String },

    #[error("AI service is currently unavailable. Please check the API configuration.")]
    MissingApiKey,

    /// The gateway exhausted its attempts.
    #[error("{raw_message}")]
    Completion {
        error_class: ErrorClass,
        raw_message: String
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidFormat { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::NoContent
            | ApiError::EmptyDocument => StatusCode::BAD_REQUEST,
            ApiError::UnreadableDocument { .. } | ApiError::MissingApiKey => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Completion { error_class, .. } => match error_class {
                ErrorClass::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ErrorClass::Timeout => StatusCode::REQUEST_TIMEOUT,
                ErrorClass::ContentFiltered => StatusCode::BAD_REQUEST,
                ErrorClass::AuthFailure | ErrorClass::Unknown => StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short machine-readable tag for the client.
    pub fn notice(&self) -> &'static str {
        match self {
            ApiError::InvalidFormat { .. } => "Invalid request format",
            ApiError::InvalidInput { .. } | ApiError::NoContent => "Invalid input",
            ApiError::EmptyDocument | ApiError::UnreadableDocument { .. } => "Document error",
            ApiError::MissingApiKey => "API configuration error",
            ApiError::Completion { error_class, .. } => match error_class {
                ErrorClass::AuthFailure => "Authentication error",
                ErrorClass::RateLimited => "Rate limit or quota exceeded",
                ErrorClass::Timeout => "Request timeout",
                ErrorClass::ContentFiltered => "Content policy restriction",
                ErrorClass::Unknown => "Technical issue"
            }
        }
    }

    /// Short description placed in the `error` field.
    fn error_field(&self) -> String {
        match self {
            ApiError::Completion { error_class, raw_message } => match error_class {
                ErrorClass::AuthFailure => "API authentication failed".to_string(),
                ErrorClass::RateLimited => "API quota exceeded".to_string(),
                ErrorClass::Timeout => "Request timeout".to_string(),
                ErrorClass::ContentFiltered => "Content filtered".to_string(),
                ErrorClass::Unknown => raw_message.clone()
            },
            other => other.to_string()
        }
    }

    /// Natural-language explanation for the `response` field, if any.
    fn explanation(&self) -> Option<&'static str> {
        match self {
            ApiError::InvalidFormat { .. } => Some(
                "There was a problem processing your request due to invalid data format."
            ),
            ApiError::MissingApiKey => Some(
                "I'm sorry, but I'm currently unable to process your request due to a \
                 configuration issue. Please contact support or try again later."
            ),
            ApiError::Completion { error_class, .. } => Some(match error_class {
                ErrorClass::AuthFailure => {
                    "I'm having trouble with my authentication. The system administrator should \
                     check that the API key is properly configured."
                }
                ErrorClass::RateLimited => {
                    "I'm currently experiencing high demand and have reached my usage limits. \
                     Please try again in 5-10 minutes. If this issue persists, please contact \
                     the administrator as the API quota may need to be increased or a different \
                     API key may need to be used."
                }
                ErrorClass::Timeout => {
                    "Your request took too long to process. This might be due to high server \
                     load or a complex request. Please try again with a simpler request or try \
                     later."
                }
                ErrorClass::ContentFiltered => {
                    "I'm unable to respond to this request due to content policy restrictions. \
                     Please rephrase it or ask about a different topic."
                }
                ErrorClass::Unknown => {
                    "I'm experiencing technical difficulties right now. Please try again in a \
                     few minutes. If the problem persists, please contact the system \
                     administrator."
                }
            }),
            _ => None
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::NoText => ApiError::EmptyDocument,
            ExtractionError::Unreadable { reason } => ApiError::UnreadableDocument { reason }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = json!({
            "error": self.error_field(),
            "notice": self.notice(),
        });
        if let Some(explanation) = self.explanation() {
            body["response"] = json!(explanation);
        }

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
