use async_trait::async_trait;
use config::UpstreamConfig;
use errors::StrategyError;
use sg_core::{CompletionRequest, CompletionStrategy, StrategyKind};
use tracing::debug;

use super::Upstream;
use super::wire::{self, Content, GenerateContentRequest, GenerationConfig};

/// Primary strategy.
///
/// Reuses one HTTP client for every call and sends the system prompt in the
/// dedicated `systemInstruction` field.
#[derive(Debug, Clone)]
pub struct SdkStrategy {
    client: reqwest::Client,
    upstream: Upstream
}

impl SdkStrategy {
    pub fn new(config: &UpstreamConfig) -> Result<Self, StrategyError> {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &UpstreamConfig) -> Result<Self, StrategyError> {
        Ok(Self {
            client,
            upstream: Upstream::from_config(config)?
        })
    }

    fn build_body(request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: (!request.system_instructions.trim().is_empty())
                .then(|| Content::instruction(request.system_instructions.clone())),
            contents: vec![Content::user([request.render_prompt()])],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens
            }
        }
    }
}

#[async_trait]
impl CompletionStrategy for SdkStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Primary
    }

    async fn generate(&self, request: &CompletionRequest) -> Result<String, StrategyError> {
        debug!(url = %self.upstream.url(), "Sending generateContent request");

        let response = self
            .client
            .post(self.upstream.url())
            .query(&[("key", self.upstream.api_key())])
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(wire::transport_error)?;

        wire::read_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_rejected() {
        let result = SdkStrategy::new(&UpstreamConfig::default());
        assert_eq!(result.err(), Some(StrategyError::MissingCredential));
    }

    #[test]
    fn test_body_uses_system_instruction() {
        let request = CompletionRequest::new("You are a tutor.", "Student question: why?", 1000);
        let body = SdkStrategy::build_body(&request);
        assert_eq!(body.system_instruction, Some(Content::instruction("You are a tutor.")));
        assert_eq!(body.contents.len(), 1);
        assert_eq!(body.contents[0].parts[0].text, "Student question: why?");
        assert_eq!(body.generation_config.max_output_tokens, 1000);
    }

    #[test]
    fn test_blank_system_prompt_is_omitted() {
        let body = SdkStrategy::build_body(&CompletionRequest::new("", "Say hello", 50));
        assert!(body.system_instruction.is_none());
    }
}
