//! Core traits for the completion gateway

use async_trait::async_trait;
use errors::StrategyError;

use crate::types::{CompletionRequest, StrategyKind};

/// One way of invoking the remote text-generation capability.
///
/// Implementations must be cancel-safe: the gateway drops the returned
/// future when the per-attempt deadline elapses.
#[async_trait]
pub trait CompletionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Produces completion text for `request` or the reason it could not.
    async fn generate(&self, request: &CompletionRequest) -> Result<String, StrategyError>;
}
