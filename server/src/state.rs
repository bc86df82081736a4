use std::sync::Arc;

use config::Config;
use gateway::CompletionGateway;
use tracing::{info, warn};

use crate::errors::{ApiError, ApiResult};
use crate::extract::{LopdfExtractor, TextExtractor};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// `None` when no API key is configured.
    pub gateway: Option<Arc<CompletionGateway>>,
    pub extractor: Arc<dyn TextExtractor>
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        let gateway = match CompletionGateway::from_config(&config) {
            Ok(gateway) => Some(Arc::new(gateway)),
            Err(e) => {
                warn!(error = %e, "Completion endpoints disabled");
                None
            }
        };

        if let Some(key) = config.upstream.api_key() {
            info!(api_key = %utils::mask_secret(key), "API key found");
        }

        Self {
            config: Arc::new(config),
            gateway,
            extractor: Arc::new(LopdfExtractor)
        }
    }

    pub fn with_gateway(config: Config, gateway: CompletionGateway) -> Self {
        Self {
            config: Arc::new(config),
            gateway: Some(Arc::new(gateway)),
            extractor: Arc::new(LopdfExtractor)
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn gateway(&self) -> ApiResult<&CompletionGateway> {
        self.gateway.as_deref().ok_or(ApiError::MissingApiKey)
    }
}
