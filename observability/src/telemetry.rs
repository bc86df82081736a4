use metrics::{counter, histogram};
use sg_core::{ErrorClass, StrategyKind};

/// Metrics emitted by the completion gateway.
///
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct GatewayTelemetry;

impl GatewayTelemetry {
    pub fn new() -> Self {
        Self
    }

    pub fn record_attempt(&self, strategy: StrategyKind, outcome: &str) {
        counter!("gateway_attempts_total",
            "strategy" => strategy.to_string(),
            "outcome" => outcome.to_string()
        )
        .increment(1);
    }

    pub fn record_retry(&self, delay_ms: u64, after_rate_limit: bool) {
        counter!("gateway_retries_total",
            "after_rate_limit" => after_rate_limit.to_string()
        )
        .increment(1);
        histogram!("gateway_backoff_delay_ms").record(delay_ms as f64);
    }

    pub fn record_failure(&self, error_class: ErrorClass) {
        counter!("gateway_failures_total", "class" => error_class.to_string()).increment(1);
    }

    pub fn record_completion(&self, attempts: u32, duration_ms: f64) {
        histogram!("gateway_completion_duration_ms").record(duration_ms);
        histogram!("gateway_attempts_per_completion").record(attempts as f64);
    }
}
