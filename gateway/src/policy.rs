//! Attempt planning: which strategy serves an attempt and how long to wait
//! before it.

use config::GatewayConfig;
use sg_core::{ErrorClass, StrategyKind};
use std::time::Duration;

/// What to do for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptPlan {
    pub strategy: StrategyKind,
    pub delay: Duration
}

/// Retry schedule of the completion gateway.
///
/// With defaults: four attempts, primary for indices 0 and 1, secondary for 2
/// and 3, exponential backoff starting at 1500ms capped at 10000ms, 10% jitter
/// and a flat 15000ms wait after a rate-limited attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub primary_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_backoff_ms: u64,
    pub rate_limit_multiplier: f64,
    pub jitter_factor: f64,
    pub attempt_timeout: Duration
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&GatewayConfig::default())
    }
}

impl From<&GatewayConfig> for RetryPolicy {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            primary_attempts: config.primary_attempts,
            initial_delay_ms: config.initial_delay_ms,
            max_backoff_ms: config.max_backoff_ms,
            rate_limit_multiplier: config.rate_limit_multiplier,
            jitter_factor: config.jitter_factor,
            attempt_timeout: Duration::from_millis(config.attempt_timeout_ms)
        }
    }
}

impl RetryPolicy {
    pub fn strategy_for(&self, attempt_index: u32) -> StrategyKind {
        if attempt_index < self.primary_attempts {
            StrategyKind::Primary
        } else {
            StrategyKind::Secondary
        }
    }

    /// Exponential delay before `attempt_index` without jitter.
    ///
    /// `min(initial_delay * 2^(attempt_index - 1), max_backoff)`, zero for the
    /// first attempt.
    pub fn base_delay_ms(&self, attempt_index: u32) -> u64 {
        if attempt_index == 0 {
            return 0;
        }
        let exponent = (attempt_index - 1).min(63);
        self.initial_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms)
    }

    pub fn rate_limit_delay_ms(&self) -> u64 {
        (self.max_backoff_ms as f64 * self.rate_limit_multiplier).round() as u64
    }

    /// Plan attempt `attempt_index` given the class of the previous failure.
    ///
    /// `jitter_sample` is clamped into `[0, 1)`; the jitter added on top of
    /// the base delay is strictly below `base * jitter_factor`.
    pub fn plan_attempt(
        &self,
        attempt_index: u32,
        last_error_class: Option<ErrorClass>,
        jitter_sample: f64
    ) -> AttemptPlan {
        let strategy = self.strategy_for(attempt_index);

        let delay = if attempt_index == 0 {
            Duration::ZERO
        } else if last_error_class == Some(ErrorClass::RateLimited) {
            Duration::from_millis(self.rate_limit_delay_ms())
        } else {
            let base_ms = self.base_delay_ms(attempt_index);
            Duration::from_millis(base_ms) + self.jitter(base_ms, jitter_sample)
        };

        AttemptPlan { strategy, delay }
    }

    fn jitter(&self, base_ms: u64, sample: f64) -> Duration {
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let ceiling_us = base_ms as f64 * 1000.0 * self.jitter_factor;
        if ceiling_us < 1.0 {
            return Duration::ZERO;
        }
        // Whole microseconds, kept strictly under the ceiling.
        let jitter_us = (ceiling_us * sample).floor().min(ceiling_us.ceil() - 1.0);
        Duration::from_micros(jitter_us.max(0.0) as u64)
    }
}

/// [`RetryPolicy::plan_attempt`] under the default schedule.
pub fn plan_attempt(
    attempt_index: u32,
    last_error_class: Option<ErrorClass>,
    jitter_sample: f64
) -> AttemptPlan {
    RetryPolicy::default().plan_attempt(attempt_index, last_error_class, jitter_sample)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_attempt_never_waits() {
        let plan = plan_attempt(0, Some(ErrorClass::RateLimited), 0.99);
        assert_eq!(plan.delay, Duration::ZERO);
        assert_eq!(plan.strategy, StrategyKind::Primary);
    }

    #[test]
    fn test_strategy_table() {
        let strategies: Vec<_> = (0..4).map(|i| plan_attempt(i, None, 0.0).strategy).collect();
        assert_eq!(
            strategies,
            vec![
                StrategyKind::Primary,
                StrategyKind::Primary,
                StrategyKind::Secondary,
                StrategyKind::Secondary
            ]
        );
    }

    #[test]
    fn test_base_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_delay_ms(1), 1500);
        assert_eq!(policy.base_delay_ms(2), 3000);
        assert_eq!(policy.base_delay_ms(3), 6000);
        assert_eq!(policy.base_delay_ms(4), 10000);
        assert_eq!(policy.base_delay_ms(40), 10000);
    }

    #[test]
    fn test_zero_jitter_sample_gives_base() {
        let plan = plan_attempt(2, Some(ErrorClass::Unknown), 0.0);
        assert_eq!(plan.delay, Duration::from_millis(3000));
    }

    #[test]
    fn test_rate_limit_overrides_schedule() {
        for attempt in 1..4 {
            let plan = plan_attempt(attempt, Some(ErrorClass::RateLimited), 0.75);
            assert_eq!(plan.delay, Duration::from_millis(15000));
        }
    }

    #[test]
    fn test_out_of_range_sample_is_clamped() {
        let plan = plan_attempt(1, None, 7.0);
        assert!(plan.delay < Duration::from_millis(1650));
        let plan = plan_attempt(1, None, f64::NAN);
        assert_eq!(plan.delay, Duration::from_millis(1500));
    }

    #[test]
    fn test_policy_from_config() {
        let config = GatewayConfig {
            max_attempts: 6,
            primary_attempts: 3,
            initial_delay_ms: 100,
            max_backoff_ms: 400,
            ..Default::default()
        };
        let policy = RetryPolicy::from(&config);
        assert_eq!(policy.strategy_for(2), StrategyKind::Primary);
        assert_eq!(policy.strategy_for(3), StrategyKind::Secondary);
        assert_eq!(policy.base_delay_ms(5), 400);
        assert_eq!(policy.rate_limit_delay_ms(), 600);
    }

    proptest! {
        #[test]
        fn prop_delay_within_jitter_bounds(
            attempt in 1u32..12,
            sample in 0.0f64..1.0,
            previous in prop_oneof![
                Just(None),
                Just(Some(ErrorClass::Unknown)),
                Just(Some(ErrorClass::Timeout)),
                Just(Some(ErrorClass::AuthFailure)),
                Just(Some(ErrorClass::ContentFiltered))
            ]
        ) {
            let base = (1500u64 << (attempt - 1).min(20)).min(10000);
            let delay = plan_attempt(attempt, previous, sample).delay;
            prop_assert!(delay >= Duration::from_millis(base));
            prop_assert!(delay.as_secs_f64() * 1000.0 < base as f64 * 1.1);
        }

        #[test]
        fn prop_rate_limit_delay_is_flat(attempt in 1u32..12, sample in 0.0f64..1.0) {
            let delay = plan_attempt(attempt, Some(ErrorClass::RateLimited), sample).delay;
            prop_assert_eq!(delay, Duration::from_millis(15000));
        }
    }
}
