use async_trait::async_trait;
use errors::StrategyError;
use sg_core::{CompletionRequest, CompletionStrategy, StrategyKind};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Strategy that replays a queue of scripted outcomes.
///
/// Once the queue is drained every call returns the fallback outcome. Calls
/// are counted and the requests they received are kept for inspection.
pub struct ScriptedStrategy {
    kind: StrategyKind,
    script: Mutex<VecDeque<Result<String, StrategyError>>>,
    fallback: Result<String, StrategyError>,
    latency: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>
}

impl ScriptedStrategy {
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            kind,
            script: Mutex::new(VecDeque::new()),
            fallback: Err(StrategyError::EmptyResponse),
            latency: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new())
        }
    }

    /// Always succeeds with `text`.
    pub fn succeeding(kind: StrategyKind, text: &str) -> Self {
        Self::new(kind).with_fallback(Ok(text.to_string()))
    }

    /// Always fails with `error`.
    pub fn failing(kind: StrategyKind, error: StrategyError) -> Self {
        Self::new(kind).with_fallback(Err(error))
    }

    pub fn with_outcome(mut self, outcome: Result<String, StrategyError>) -> Self {
        self.script.get_mut().push_back(outcome);
        self
    }

    pub fn with_fallback(mut self, outcome: Result<String, StrategyError>) -> Self {
        self.fallback = outcome;
        self
    }

    /// Every call sleeps for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl CompletionStrategy for ScriptedStrategy {
    fn kind(&self) -> StrategyKind {
        self.kind
    }

    async fn generate(&self, request: &CompletionRequest) -> Result<String, StrategyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self.script.lock().await.pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let strategy = ScriptedStrategy::succeeding(StrategyKind::Primary, "done")
            .with_outcome(Err(StrategyError::EmptyResponse));
        let request = CompletionRequest::new("sys", "hello", 10);

        assert_eq!(
            strategy.generate(&request).await,
            Err(StrategyError::EmptyResponse)
        );
        assert_eq!(strategy.generate(&request).await, Ok("done".to_string()));
        assert_eq!(strategy.calls(), 2);
        assert_eq!(strategy.requests().await[0].user_content, "hello");
    }
}
