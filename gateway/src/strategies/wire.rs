//! Gemini `generateContent` payloads and response handling shared by both
//! strategies.

use errors::StrategyError;
use serde::{Deserialize, Serialize};

/// Finish reasons that mean the model refused to answer.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    #[serde(default)]
    pub text: String
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>
}

impl Content {
    pub fn user(texts: impl IntoIterator<Item = String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: texts.into_iter().map(|text| Part { text }).collect()
        }
    }

    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }]
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub max_output_tokens: u32
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>
}

/// `{base_url}/models/{model}:generateContent`
pub fn endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Pull the completion text out of a successful response.
pub fn extract_text(response: GenerateContentResponse) -> Result<String, StrategyError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(StrategyError::ContentBlocked { reason });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(StrategyError::EmptyResponse);
    };

    if let Some(reason) = candidate
        .finish_reason
        .filter(|r| BLOCKING_FINISH_REASONS.contains(&r.as_str()))
    {
        return Err(StrategyError::ContentBlocked { reason });
    }

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(StrategyError::EmptyResponse);
    }
    Ok(text)
}

/// Turn an upstream HTTP response into completion text or a strategy error.
pub async fn read_response(response: reqwest::Response) -> Result<String, StrategyError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(StrategyError::Upstream {
            status: status.as_u16(),
            message: upstream_message(&body)
        });
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(&body).map_err(|e| StrategyError::MalformedPayload {
            reason: e.to_string()
        })?;
    extract_text(parsed)
}

fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) if !envelope.error.message.is_empty() => {
                format!("{} ({})", envelope.error.message, status)
            }
            Some(status) => status,
            None => envelope.error.message
        },
        Err(_) => utils::preview(body.trim(), 200)
    }
}

/// Transport failures never carry the request URL: it holds the API key.
pub fn transport_error(error: reqwest::Error) -> StrategyError {
    StrategyError::Transport {
        reason: error.without_url().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            system_instruction: Some(Content::instruction("Be brief.")),
            contents: vec![Content::user(["Hi".to_string()])],
            generation_config: GenerationConfig {
                max_output_tokens: 50
            }
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "systemInstruction": {"parts": [{"text": "Be brief."}]},
                "contents": [{"role": "user", "parts": [{"text": "Hi"}]}],
                "generationConfig": {"maxOutputTokens": 50}
            })
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let parsed = response(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Photo"}, {"text": "synthesis"}]},
                "finishReason": "STOP"
            }]
        }));
        assert_eq!(extract_text(parsed).unwrap(), "Photosynthesis");
    }

    #[test]
    fn test_prompt_block_reason() {
        let parsed = response(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        assert_eq!(
            extract_text(parsed),
            Err(StrategyError::ContentBlocked {
                reason: "SAFETY".to_string()
            })
        );
    }

    #[test]
    fn test_safety_finish_reason() {
        let parsed = response(json!({"candidates": [{"finishReason": "PROHIBITED_CONTENT"}]}));
        assert!(matches!(
            extract_text(parsed),
            Err(StrategyError::ContentBlocked { .. })
        ));
    }

    #[test]
    fn test_blank_text_is_empty_response() {
        let parsed = response(json!({"candidates": [{"content": {"parts": [{"text": "  "}]}}]}));
        assert_eq!(extract_text(parsed), Err(StrategyError::EmptyResponse));
        assert_eq!(
            extract_text(response(json!({}))),
            Err(StrategyError::EmptyResponse)
        );
    }

    #[test]
    fn test_upstream_message_from_envelope() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(
            upstream_message(body),
            "Resource has been exhausted (RESOURCE_EXHAUSTED)"
        );
        assert_eq!(upstream_message("<html>bad gateway</html>"), "<html>bad gateway</html>");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            endpoint("http://localhost:1234/v1beta/", "gemini-1.5-flash"),
            "http://localhost:1234/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
