//! Configuration for spam-api
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `SPAM_API__<SECTION>__<KEY>` environment variables.
//!
//! ```toml
//! [server]
//! listen_addr = "0.0.0.0:8000"
//!
//! [model]
//! vectorizer_path = "model/vectorizer.bin"
//! classifier_path = "model/spam_classifier.bin"
//! default_threshold = 0.5
//! preprocess_requests = true
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "SPAM_API";
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:8000")
    pub listen_addr: String,
}

/// Model artifacts and decision settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    pub vectorizer_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Threshold used when a request does not specify one
    pub default_threshold: f64,
    /// Apply training-time preprocessing to request text
    pub preprocess_requests: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vectorizer_path: PathBuf::from("model/vectorizer.bin"),
            classifier_path: PathBuf::from("model/spam_classifier.bin"),
            default_threshold: 0.5,
            preprocess_requests: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load defaults, the optional file at `path`, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, environment())
    }

    pub fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let config: Self = builder.add_source(env).build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.model.default_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "model.default_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        if self.server.listen_addr.is_empty() {
            return Err(ConfigError::Invalid("server.listen_addr is empty".into()));
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:8000");
        assert_eq!(config.model.vectorizer_path, PathBuf::from("model/vectorizer.bin"));
        assert_eq!(config.model.classifier_path, PathBuf::from("model/spam_classifier.bin"));
        assert_eq!(config.model.default_threshold, 0.5);
        assert!(config.model.preprocess_requests);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_then_env() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spam-api.toml");
        std::fs::write(
            &path,
            "[server]\nlisten_addr = \"127.0.0.1:9000\"\n\n[model]\ndefault_threshold = 0.7\n",
        )
        .unwrap();

        let config = ApiConfig::load_with_env(
            Some(path.as_path()),
            env(&[("SPAM_API__MODEL__DEFAULT_THRESHOLD", "0.3")]),
        )
        .unwrap();
        assert_eq!(config.server.listen_addr, "127.0.0.1:9000");
        assert_eq!(config.model.default_threshold, 0.3);
        assert_eq!(config.model.vectorizer_path, PathBuf::from("model/vectorizer.bin"));
    }

    #[test]
    fn test_missing_file_is_optional() {
        let dir = TempDir::new().unwrap();
        let config = ApiConfig::load_with_env(Some(dir.path().join("absent.toml").as_path()), env(&[])).unwrap();
        assert_eq!(config.model.default_threshold, 0.5);
    }

    #[test]
    fn test_invalid_threshold() {
        let result = ApiConfig::load_with_env(None, env(&[("SPAM_API__MODEL__DEFAULT_THRESHOLD", "1.5")]));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
