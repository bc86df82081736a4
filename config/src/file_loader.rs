//! # Configuration File Loading
//!
//! Loads configuration from TOML or YAML files.
//!
//! Supports automatic format detection based on file extension.

use crate::config::Config;
use std::path::Path;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String)
}

/// Load configuration from TOML file.
///
/// Missing sections and fields fall back to their defaults.
pub fn load_from_toml(path: &Path) -> Result<Config, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    toml::from_str(&contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

/// Load configuration from YAML file.
pub fn load_from_yaml(path: &Path) -> Result<Config, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Load configuration from file with auto-detection.
///
/// # M-CANONICAL-DOCS
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_file;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_from_file(Path::new("studygenie.toml"))?;
///     println!("Attempts: {}", config.gateway.max_attempts);
///     Ok(())
/// }
/// ```
pub fn load_from_file(path: &Path) -> Result<Config, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studygenie.toml");

        let toml_content = r#"
[upstream]
model = "gemini-2.0-flash"

[gateway]
max_attempts = 3
initial_delay_ms = 500

[server]
port = 8081

[observability]
logging_level = "debug"
"#;
        fs::write(&path, toml_content).unwrap();

        let config = load_from_toml(&path).unwrap();
        assert_eq!(config.upstream.model, "gemini-2.0-flash");
        assert_eq!(config.gateway.max_attempts, 3);
        assert_eq!(config.gateway.initial_delay_ms, 500);
        assert_eq!(config.gateway.max_backoff_ms, 10000);
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.observability.logging_level, "debug");
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studygenie.yaml");

        let yaml_content = r#"
gateway:
  attempt_timeout_ms: 5000
server:
  max_message_chars: 500
"#;
        fs::write(&path, yaml_content).unwrap();

        let config = load_from_yaml(&path).unwrap();
        assert_eq!(config.gateway.attempt_timeout_ms, 5000);
        assert_eq!(config.server.max_message_chars, 500);
        assert_eq!(config.upstream.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_file_api_key_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studygenie.yml");
        fs::write(&path, "upstream:\n  api_key: from-file\n").unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.upstream.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_load_from_file_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studygenie.json");
        fs::write(&path, "{}").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_from_file_no_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("studygenie");
        fs::write(&path, "").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::NoExtension)));
    }

    #[test]
    fn test_load_from_toml_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[invalid\n").unwrap();

        let result = load_from_toml(&path);
        assert!(matches!(result, Err(ConfigFileError::TomlParse(_))));
    }

    #[test]
    fn test_load_from_toml_not_found() {
        let path = Path::new("/nonexistent/path/config.toml");
        let result = load_from_toml(path);
        assert!(matches!(result, Err(ConfigFileError::FileNotFound(_))));
    }
}
