//! Reading study material out of summarize/quiz request bodies.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use errors::ExtractionError;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{ApiError, ApiResult};

/// Turns document bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF text extraction backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let document = lopdf::Document::load_mem(bytes).map_err(|e| ExtractionError::Unreadable {
            reason: e.to_string()
        })?;

        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        let text = document
            .extract_text(&pages)
            .map_err(|e| ExtractionError::Unreadable {
                reason: e.to_string()
            })?;

        if text.trim().is_empty() {
            return Err(ExtractionError::NoText);
        }
        Ok(text)
    }
}

/// Where the material came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Pdf { file_name: String, bytes: Vec<u8> },
    Text(String)
}

#[derive(Debug, Deserialize)]
struct DocumentBody {
    #[serde(default)]
    text: Option<String>
}

/// Read the material from a multipart form (`file` wins over `text`), a JSON
/// `{ "text": ... }` body or a raw text body.
pub async fn read_source(request: Request) -> ApiResult<DocumentSource> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::InvalidFormat {
                reason: e.body_text()
            })?;
        return read_multipart(multipart).await;
    }

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<DocumentBody>::from_request(request, &())
            .await
            .map_err(|e| ApiError::InvalidFormat {
                reason: e.body_text()
            })?;
        return body.text.map(DocumentSource::Text).ok_or(ApiError::NoContent);
    }

    let text = String::from_request(request, &())
        .await
        .map_err(|e| ApiError::InvalidFormat {
            reason: e.body_text()
        })?;
    if text.is_empty() {
        return Err(ApiError::NoContent);
    }
    Ok(DocumentSource::Text(text))
}

async fn read_multipart(mut multipart: Multipart) -> ApiResult<DocumentSource> {
    let mut file = None;
    let mut text = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::InvalidFormat {
        reason: e.body_text()
    })? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
                let bytes = field.bytes().await.map_err(|e| ApiError::InvalidFormat {
                    reason: e.body_text()
                })?;
                if !bytes.is_empty() {
                    file = Some(DocumentSource::Pdf {
                        file_name,
                        bytes: bytes.to_vec()
                    });
                }
            }
            Some("text") => {
                let value = field.text().await.map_err(|e| ApiError::InvalidFormat {
                    reason: e.body_text()
                })?;
                if !value.is_empty() {
                    text = Some(DocumentSource::Text(value));
                }
            }
            other => debug!(field = ?other, "Ignoring form field"),
        }
    }

    file.or(text).ok_or(ApiError::NoContent)
}

/// Resolve a source to the text sent upstream.
///
/// PDF parsing runs on the blocking pool.
pub async fn resolve_text(
    source: DocumentSource,
    extractor: Arc<dyn TextExtractor>
) -> ApiResult<String> {
    match source {
        DocumentSource::Text(text) => {
            debug!(preview = %utils::preview(&text, 300), "Text content received");
            Ok(text)
        }
        DocumentSource::Pdf { file_name, bytes } => {
            info!(file_name = %file_name, size = bytes.len(), "PDF uploaded");
            let text = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
                .await
                .map_err(|e| ApiError::UnreadableDocument {
                    reason: e.to_string()
                })??;
            debug!(preview = %utils::preview(&text, 300), "Extracted PDF text");
            Ok(text)
        }
    }
}
