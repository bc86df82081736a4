use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Handle to the installed filter, used to apply the configured level once
/// configuration has been resolved.
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned_by_env: bool
}

impl LogLevelHandle {
    /// Switch the filter to `level`. A `RUST_LOG` filter is never replaced.
    pub fn apply(&self, level: &str) {
        if self.pinned_by_env {
            return;
        }
        if let Err(e) = self.handle.reload(EnvFilter::new(level)) {
            tracing::debug!(error = %e, "Log level not applied");
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` (e.g. "info") applies
/// until [`LogLevelHandle::apply`] replaces it. Calling this twice is
/// harmless: the second installation is ignored.
pub fn init_tracing(default_level: &str) -> LogLevelHandle {
    let (filter, pinned_by_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(default_level), false)
    };

    let (subscriber, handle) = build_subscriber(filter, pinned_by_env);
    if subscriber.try_init().is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
    handle
}

fn build_subscriber(
    filter: EnvFilter,
    pinned_by_env: bool
) -> (
    impl tracing::Subscriber + Send + Sync + 'static,
    LogLevelHandle
) {
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry().with(filter).with(fmt::layer());
    (
        subscriber,
        LogLevelHandle {
            handle,
            pinned_by_env
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing("info").apply("warn");
        init_tracing("debug").apply("info");
    }

    #[test]
    fn test_configured_level_applies_after_startup() {
        let (subscriber, handle) = build_subscriber(EnvFilter::new("info"), false);

        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::enabled!(Level::DEBUG));
            handle.apply("debug");
            assert!(tracing::enabled!(Level::DEBUG));
        });
    }

    #[test]
    fn test_env_filter_is_never_replaced() {
        let (subscriber, handle) = build_subscriber(EnvFilter::new("warn"), true);

        tracing::subscriber::with_default(subscriber, || {
            handle.apply("trace");
            assert!(!tracing::enabled!(Level::INFO));
        });
    }
}
