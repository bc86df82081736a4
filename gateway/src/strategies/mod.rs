//! Upstream clients implementing [`CompletionStrategy`](sg_core::CompletionStrategy).

pub mod direct;
pub mod sdk;
pub mod wire;

pub use direct::DirectStrategy;
pub use sdk::SdkStrategy;

use config::UpstreamConfig;
use errors::StrategyError;

/// Connection settings shared by both strategies.
#[derive(Clone)]
pub(crate) struct Upstream {
    api_key: String,
    url: String
}

impl Upstream {
    pub(crate) fn from_config(config: &UpstreamConfig) -> Result<Self, StrategyError> {
        let api_key = config.api_key().ok_or(StrategyError::MissingCredential)?;
        Ok(Self {
            api_key: api_key.to_string(),
            url: wire::endpoint(&config.base_url, &config.model)
        })
    }

    pub(crate) fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl std::fmt::Debug for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upstream")
            .field("api_key", &utils::mask_secret(&self.api_key))
            .field("url", &self.url)
            .finish()
    }
}
