//! # Configuration System
//!
//! Centralized configuration management for the StudyGenie gateway.
//!
//! This crate provides:
//! - Configuration structures for the upstream client, retry policy, server
//!   and logging
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML/YAML)
//! - Configuration precedence (env > file > defaults)
//! - Configuration validation

pub mod config;
pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod validation;

pub use config::{Config, GatewayConfig, ObservabilityConfig, ServerConfig, UpstreamConfig};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use loader::{API_KEY_VAR, EnvError, apply_env, load_from_env};
pub use precedence::{CONFIG_PATH_VAR, ConfigError, load, resolve};
pub use validation::validate;
