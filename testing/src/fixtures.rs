use config::{Config, GatewayConfig, UpstreamConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "AIzaTestKey0000";
pub const TEST_MODEL: &str = "gemini-1.5-flash";

/// Body of a successful `generateContent` response carrying `text`.
pub fn success_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8}
    })
}

/// Body of a Gemini error response.
pub fn error_body(code: u16, message: &str, status: &str) -> serde_json::Value {
    json!({"error": {"code": code, "message": message, "status": status}})
}

/// Retry settings that keep real-time tests fast.
pub fn fast_gateway_config() -> GatewayConfig {
    GatewayConfig {
        initial_delay_ms: 1,
        max_backoff_ms: 4,
        rate_limit_multiplier: 1.5,
        attempt_timeout_ms: 2000,
        ..Default::default()
    }
}

/// Fake Gemini upstream.
pub struct GeminiMock {
    server: MockServer
}

impl GeminiMock {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        tracing::debug!(uri = %server.uri(), "Fake Gemini upstream started");
        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn generate_path() -> String {
        format!("/models/{}:generateContent", TEST_MODEL)
    }

    /// Upstream settings pointing at this server with a valid key.
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            api_key: Some(TEST_API_KEY.to_string()),
            base_url: self.uri(),
            model: TEST_MODEL.to_string()
        }
    }

    /// Full configuration pointing at this server with fast retries.
    pub fn config(&self) -> Config {
        Config {
            upstream: self.upstream_config(),
            gateway: fast_gateway_config(),
            ..Default::default()
        }
    }

    fn generate() -> wiremock::MockBuilder {
        Mock::given(method("POST"))
            .and(path(Self::generate_path()))
            .and(query_param("key", TEST_API_KEY))
    }

    /// Answer every call with `text`.
    pub async fn mount_success(&self, text: &str) {
        Self::generate()
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body(text)))
            .mount(&self.server)
            .await;
    }

    /// Answer every call with an error envelope.
    pub async fn mount_error(&self, code: u16, message: &str, status: &str) {
        Self::generate()
            .respond_with(ResponseTemplate::new(code).set_body_json(error_body(code, message, status)))
            .mount(&self.server)
            .await;
    }

    /// Answer the next `times` calls with an error envelope, before any
    /// other mounted response.
    pub async fn mount_error_times(&self, code: u16, message: &str, status: &str, times: u64) {
        Self::generate()
            .respond_with(ResponseTemplate::new(code).set_body_json(error_body(code, message, status)))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Refuse every prompt with a `promptFeedback.blockReason`.
    pub async fn mount_blocked(&self, reason: &str) {
        Self::generate()
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"promptFeedback": {"blockReason": reason}}))
            )
            .mount(&self.server)
            .await;
    }

    /// Requests the server has received so far.
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| serde_json::from_slice(&request.body).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_config_points_at_mock() {
        let mock = GeminiMock::start().await;
        let config = mock.config();
        assert_eq!(config.upstream.base_url, mock.uri());
        assert!(config.upstream.has_api_key());
        assert_eq!(config.gateway.max_attempts, 4);
    }
}
