//! # Configuration Precedence
//!
//! Resolves the effective configuration from layered sources.
//!
//! # Precedence Order
//! 1. Environment variables (highest priority)
//! 2. Configuration file
//! 3. Default values (lowest priority)

use crate::config::Config;
use crate::file_loader::{ConfigFileError, load_from_file};
use crate::loader::{EnvError, apply_env};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

/// Variable naming an optional TOML/YAML configuration file.
pub const CONFIG_PATH_VAR: &str = "STUDYGENIE_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    File(#[from] ConfigFileError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors)
}

/// Resolve configuration using the file named by `STUDYGENIE_CONFIG`, if any.
pub fn load() -> Result<Config, ConfigError> {
    let path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
    resolve(path.as_deref())
}

/// Resolve configuration from an optional file, then the environment.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Starts from defaults (or the file when given), applies environment
/// overrides and validates the result.
///
/// ## Usage
/// ```rust,no_run
/// use config::resolve;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = resolve(Some(Path::new("studygenie.toml")))?;
///     println!("Listening on port {}", config.server.port);
///     Ok(())
/// }
/// ```
pub fn resolve(file: Option<&Path>) -> Result<Config, ConfigError> {
    let base = match file {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration file");
            load_from_file(path)?
        }
        None => Config::default()
    };

    let config = apply_env(base)?;
    config.validate()?;

    info!(
        model = %config.upstream.model,
        has_api_key = config.upstream.has_api_key(),
        max_attempts = config.gateway.max_attempts,
        "Configuration resolved"
    );

    Ok(config)
}
