//! # Observability Module
//!
//! - `tracing` subscriber setup shared by every binary
//! - Gateway counters and histograms recorded through the `metrics` facade

pub mod logging;
pub mod telemetry;

pub use logging::{LogLevelHandle, init_tracing};
pub use telemetry::GatewayTelemetry;
