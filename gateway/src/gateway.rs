use std::sync::Arc;
use std::time::Duration;

use config::Config;
use errors::StrategyError;
use observability::GatewayTelemetry;
use sg_core::{CompletionRequest, CompletionResult, CompletionStrategy, ErrorClass, StrategyKind};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::classify::classify_error;
use crate::policy::RetryPolicy;
use crate::strategies::{DirectStrategy, SdkStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttemptOutcome {
    Success,
    Error
}

/// What happened during one attempt. Only lives for one `complete` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttemptRecord {
    pub attempt_index: u32,
    pub strategy: StrategyKind,
    pub delay: Duration,
    pub outcome: AttemptOutcome,
    pub error_class: Option<ErrorClass>
}

/// Resilient front door to the remote generation capability.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Runs up to `max_attempts` sequential attempts for one prompt, switching
/// from the primary to the secondary strategy part-way through, sleeping
/// between attempts and bounding every attempt by its own deadline.
///
/// ## Contract
/// [`complete`](Self::complete) never fails: every path ends in a
/// [`CompletionResult`]. A success always carries non-blank text.
///
/// ## Usage
/// ```rust,no_run
/// use gateway::CompletionGateway;
/// use sg_core::CompletionRequest;
///
/// # async fn run(config: &config::Config) -> Result<(), Box<dyn std::error::Error>> {
/// let gateway = CompletionGateway::from_config(config)?;
/// let result = gateway
///     .complete(&CompletionRequest::new("You are a tutor.", "What is a prime?", 1000))
///     .await;
/// println!("{:?}", result);
/// # Ok(())
/// # }
/// ```
pub struct CompletionGateway {
    primary: Arc<dyn CompletionStrategy>,
    secondary: Arc<dyn CompletionStrategy>,
    policy: RetryPolicy,
    telemetry: GatewayTelemetry
}

impl CompletionGateway {
    pub fn new(
        primary: Arc<dyn CompletionStrategy>,
        secondary: Arc<dyn CompletionStrategy>,
        policy: RetryPolicy
    ) -> Self {
        if primary.kind() != StrategyKind::Primary || secondary.kind() != StrategyKind::Secondary {
            warn!(
                primary = %primary.kind(),
                secondary = %secondary.kind(),
                "Strategies wired into unexpected slots"
            );
        }
        Self {
            primary,
            secondary,
            policy,
            telemetry: GatewayTelemetry::new()
        }
    }

    /// Build the Gemini-backed gateway.
    ///
    /// Fails with [`StrategyError::MissingCredential`] when no API key is set.
    pub fn from_config(config: &Config) -> Result<Self, StrategyError> {
        let primary = SdkStrategy::new(&config.upstream)?;
        let secondary = DirectStrategy::new(&config.upstream)?;

        info!(
            model = %config.upstream.model,
            max_attempts = config.gateway.max_attempts,
            "Completion gateway ready"
        );

        Ok(Self::new(
            Arc::new(primary),
            Arc::new(secondary),
            RetryPolicy::from(&config.gateway)
        ))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn strategy(&self, kind: StrategyKind) -> &dyn CompletionStrategy {
        match kind {
            StrategyKind::Primary => self.primary.as_ref(),
            StrategyKind::Secondary => self.secondary.as_ref()
        }
    }

    pub async fn complete(&self, request: &CompletionRequest) -> CompletionResult {
        self.complete_traced(request).await.0
    }

    pub(crate) async fn complete_traced(
        &self,
        request: &CompletionRequest
    ) -> (CompletionResult, Vec<AttemptRecord>) {
        let started = Instant::now();
        let mut records = Vec::with_capacity(self.policy.max_attempts as usize);
        let mut last_error: Option<(ErrorClass, String)> = None;

        for attempt_index in 0..self.policy.max_attempts {
            let previous_class = last_error.as_ref().map(|(class, _)| *class);
            let plan = self
                .policy
                .plan_attempt(attempt_index, previous_class, rand::random::<f64>());

            if !plan.delay.is_zero() {
                let delay_ms = plan.delay.as_millis() as u64;
                let after_rate_limit = previous_class == Some(ErrorClass::RateLimited);
                info!(
                    attempt = attempt_index + 1,
                    delay_ms,
                    after_rate_limit,
                    "Backing off before next attempt"
                );
                self.telemetry.record_retry(delay_ms, after_rate_limit);
                tokio::time::sleep(plan.delay).await;
            }

            let strategy = self.strategy(plan.strategy);
            let kind = strategy.kind();
            info!(
                attempt = attempt_index + 1,
                max_attempts = self.policy.max_attempts,
                strategy = %kind,
                "Requesting completion"
            );

            match self.attempt(strategy, request).await {
                Ok(text) => {
                    self.telemetry.record_attempt(kind, "success");
                    records.push(AttemptRecord {
                        attempt_index,
                        strategy: kind,
                        delay: plan.delay,
                        outcome: AttemptOutcome::Success,
                        error_class: None
                    });
                    self.telemetry.record_completion(
                        attempt_index + 1,
                        started.elapsed().as_secs_f64() * 1000.0
                    );
                    info!(
                        attempt = attempt_index + 1,
                        strategy = %kind,
                        chars = text.chars().count(),
                        "Completion succeeded"
                    );
                    return (CompletionResult::Success { text }, records);
                }
                Err(error) => {
                    let error_class = classify_error(&error);
                    self.telemetry.record_attempt(kind, "error");
                    warn!(
                        attempt = attempt_index + 1,
                        strategy = %kind,
                        error_class = %error_class,
                        error = %error,
                        "Completion attempt failed"
                    );
                    records.push(AttemptRecord {
                        attempt_index,
                        strategy: kind,
                        delay: plan.delay,
                        outcome: AttemptOutcome::Error,
                        error_class: Some(error_class)
                    });
                    last_error = Some((error_class, error.to_string()));
                }
            }
        }

        let (error_class, raw_message) = last_error
            .unwrap_or_else(|| (ErrorClass::Unknown, "no attempt was made".to_string()));

        self.telemetry.record_failure(error_class);
        self.telemetry.record_completion(
            records.len() as u32,
            started.elapsed().as_secs_f64() * 1000.0
        );
        warn!(
            attempts = records.len(),
            error_class = %error_class,
            "All completion attempts failed"
        );

        (
            CompletionResult::Failure {
                error_class,
                raw_message
            },
            records
        )
    }

    /// One attempt bounded by the per-attempt deadline. Expiry drops the
    /// in-flight call.
    async fn attempt(
        &self,
        strategy: &dyn CompletionStrategy,
        request: &CompletionRequest
    ) -> Result<String, StrategyError> {
        let deadline = self.policy.attempt_timeout;
        match tokio::time::timeout(deadline, strategy.generate(request)).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(StrategyError::EmptyResponse),
            Ok(result) => result,
            Err(_) => Err(StrategyError::Timeout {
                timeout_ms: deadline.as_millis() as u64
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedStrategy;

    fn request() -> CompletionRequest {
        CompletionRequest::new("You are a tutor.", "Student question: what is 2+2?", 1000)
    }

    fn gateway(
        primary: Arc<ScriptedStrategy>,
        secondary: Arc<ScriptedStrategy>
    ) -> CompletionGateway {
        CompletionGateway::new(primary, secondary, RetryPolicy::default())
    }

    fn upstream(status: u16, message: &str) -> StrategyError {
        StrategyError::Upstream {
            status,
            message: message.to_string()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_failures_alternate_strategies() {
        let primary = Arc::new(ScriptedStrategy::failing(
            StrategyKind::Primary,
            upstream(500, "Internal error encountered")
        ));
        let secondary = Arc::new(
            ScriptedStrategy::failing(StrategyKind::Secondary, upstream(500, "Internal error encountered"))
                .with_outcome(Err(upstream(500, "Internal error encountered")))
                .with_outcome(Err(StrategyError::Timeout { timeout_ms: 30000 }))
        );
        let gateway = gateway(primary.clone(), secondary.clone());

        let (result, records) = gateway.complete_traced(&request()).await;

        let strategies: Vec<_> = records.iter().map(|r| r.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                StrategyKind::Primary,
                StrategyKind::Primary,
                StrategyKind::Secondary,
                StrategyKind::Secondary
            ]
        );
        assert_eq!(primary.calls(), 2);
        assert_eq!(secondary.calls(), 2);
        // Final class comes from the fourth attempt.
        assert_eq!(result.error_class(), Some(ErrorClass::Timeout));
        assert!(records.iter().all(|r| r.outcome == AttemptOutcome::Error));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_has_no_delay() {
        let primary = Arc::new(ScriptedStrategy::succeeding(StrategyKind::Primary, "4"));
        let secondary = Arc::new(ScriptedStrategy::succeeding(StrategyKind::Secondary, "unused"));
        let gateway = gateway(primary.clone(), secondary.clone());

        let (result, records) = gateway.complete_traced(&request()).await;

        assert_eq!(result, CompletionResult::Success { text: "4".to_string() });
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].delay, Duration::ZERO);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_attempt_waits_fifteen_seconds() {
        let primary = Arc::new(
            ScriptedStrategy::succeeding(StrategyKind::Primary, "recovered")
                .with_outcome(Err(upstream(429, "Resource has been exhausted (e.g. check quota).")))
        );
        let secondary = Arc::new(ScriptedStrategy::new(StrategyKind::Secondary));
        let gateway = gateway(primary.clone(), secondary);

        let started = Instant::now();
        let (result, records) = gateway.complete_traced(&request()).await;

        assert!(result.is_success());
        assert_eq!(records[0].error_class, Some(ErrorClass::RateLimited));
        assert_eq!(records[1].delay, Duration::from_millis(15000));
        assert!(started.elapsed() >= Duration::from_millis(15000));
        assert!(started.elapsed() < Duration::from_millis(15100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_stay_in_bounds() {
        let primary = Arc::new(ScriptedStrategy::failing(
            StrategyKind::Primary,
            upstream(503, "The model is overloaded")
        ));
        let secondary = Arc::new(ScriptedStrategy::failing(
            StrategyKind::Secondary,
            upstream(503, "The model is overloaded")
        ));
        let gateway = gateway(primary, secondary);

        let (_, records) = gateway.complete_traced(&request()).await;

        for (record, base_ms) in records.iter().skip(1).zip([1500u64, 3000, 6000]) {
            assert!(record.delay >= Duration::from_millis(base_ms));
            assert!(record.delay.as_secs_f64() * 1000.0 < base_ms as f64 * 1.1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_attempt_times_out() {
        let primary = Arc::new(
            ScriptedStrategy::succeeding(StrategyKind::Primary, "too late")
                .with_latency(Duration::from_secs(31))
        );
        let secondary = Arc::new(
            ScriptedStrategy::succeeding(StrategyKind::Secondary, "too late")
                .with_latency(Duration::from_secs(31))
        );
        let gateway = gateway(primary.clone(), secondary.clone());

        let result = gateway.complete(&request()).await;

        assert_eq!(result.error_class(), Some(ErrorClass::Timeout));
        assert_eq!(primary.calls() + secondary.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_is_a_failed_attempt() {
        let primary = Arc::new(
            ScriptedStrategy::succeeding(StrategyKind::Primary, "second try")
                .with_outcome(Ok("   ".to_string()))
        );
        let secondary = Arc::new(ScriptedStrategy::new(StrategyKind::Secondary));
        let gateway = gateway(primary.clone(), secondary);

        let (result, records) = gateway.complete_traced(&request()).await;

        assert_eq!(
            result,
            CompletionResult::Success {
                text: "second try".to_string()
            }
        );
        assert_eq!(records[0].outcome, AttemptOutcome::Error);
        assert_eq!(records[0].error_class, Some(ErrorClass::Unknown));
        assert_eq!(primary.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_secondary_rescues_after_primary_failures() {
        let primary = Arc::new(ScriptedStrategy::failing(
            StrategyKind::Primary,
            StrategyError::Transport {
                reason: "connection reset".to_string()
            }
        ));
        let secondary = Arc::new(ScriptedStrategy::succeeding(StrategyKind::Secondary, "from secondary"));
        let gateway = gateway(primary.clone(), secondary.clone());

        let result = gateway.complete(&request()).await;

        assert!(result.is_success());
        assert_eq!(primary.calls(), 2);
        assert_eq!(secondary.calls(), 1);
        assert_eq!(secondary.requests().await[0], request());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_are_labelled_by_the_strategy_that_ran() {
        // Two primaries wired in: the secondary slot still reports its own kind.
        let first = Arc::new(ScriptedStrategy::failing(
            StrategyKind::Primary,
            upstream(500, "Internal error encountered")
        ));
        let second = Arc::new(ScriptedStrategy::failing(
            StrategyKind::Primary,
            upstream(500, "Internal error encountered")
        ));
        let gateway = gateway(first.clone(), second.clone());

        let (_, records) = gateway.complete_traced(&request()).await;

        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.strategy == StrategyKind::Primary));
        assert_eq!(first.calls(), 2);
        assert_eq!(second.calls(), 2);
    }
}
