use async_trait::async_trait;
use config::UpstreamConfig;
use errors::StrategyError;
use sg_core::{CompletionRequest, CompletionStrategy, StrategyKind};
use tracing::debug;

use super::Upstream;
use super::wire::{self, Content, GenerateContentRequest, GenerationConfig};

/// Secondary strategy.
///
/// Builds a fresh HTTP client for every call. The system prompt travels as
/// the first part of the user content.
#[derive(Debug, Clone)]
pub struct DirectStrategy {
    upstream: Upstream
}

impl DirectStrategy {
    pub fn new(config: &UpstreamConfig) -> Result<Self, StrategyError> {
        Ok(Self {
            upstream: Upstream::from_config(config)?
        })
    }

    fn build_body(request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user(
                [request.system_instructions.clone(), request.render_prompt()]
                    .into_iter()
                    .filter(|text| !text.trim().is_empty())
            )],
            generation_config: GenerationConfig {
                max_output_tokens: request.max_output_tokens
            }
        }
    }
}

#[async_trait]
impl CompletionStrategy for DirectStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Secondary
    }

    async fn generate(&self, request: &CompletionRequest) -> Result<String, StrategyError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(wire::transport_error)?;

        debug!(url = %self.upstream.url(), "Sending generateContent request on a fresh client");

        let response = client
            .post(self.upstream.url())
            .query(&[("key", self.upstream.api_key())])
            .json(&Self::build_body(request))
            .send()
            .await
            .map_err(wire::transport_error)?;

        wire::read_response(response).await
    }
}
