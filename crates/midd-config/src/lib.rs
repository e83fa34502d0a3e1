//! Configuration system for the MIDD policy engine.
//!
//! Load engine configuration from TOML or YAML to control policy
//! compilation, batch evaluation and log filtering without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use midd_config::EngineConfig;
//! use midd_engine::CombiningAlgorithm;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     [compile]
//!     default_policy_combining = "first-applicable"
//!
//!     [evaluation]
//!     parallel_threshold = 256
//! "#).unwrap();
//!
//! assert_eq!(config.compile.default_policy_combining, CombiningAlgorithm::FirstApplicable);
//! assert_eq!(config.evaluation.parallel_threshold, 256);
//! assert!(config.compile.skip_non_transformable);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use midd_config::EngineConfig;
//!
//! let config = EngineConfig::load("midd.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use midd_engine::CombiningAlgorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Policy compilation settings.
    #[serde(default)]
    pub compile: CompileConfig,

    /// Request evaluation settings.
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Log filtering.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the algorithm used by containers that do not name one.
    pub fn with_default_policy_combining(mut self, algorithm: CombiningAlgorithm) -> Self {
        self.compile.default_policy_combining = algorithm;
        self
    }

    /// Sets whether children that never apply are skipped or fatal.
    pub fn with_skip_non_transformable(mut self, skip: bool) -> Self {
        self.compile.skip_non_transformable = skip;
        self
    }

    /// Sets the batch size at which evaluation goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.evaluation.parallel_threshold = threshold;
        self
    }

    /// Sets the log filter directive.
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.logging.filter = Some(filter.into());
        self
    }

    /// Checks values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.evaluation.parallel_threshold == 0 {
            return Err(ConfigError::Invalid(
                "evaluation.parallel_threshold must be at least 1".to_string(),
            ));
        }
        if let Some(filter) = &self.logging.filter {
            if filter.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "logging.filter must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Policy compilation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompileConfig {
    /// Algorithm for policy sets and policies that do not name one.
    #[serde(default)]
    pub default_policy_combining: CombiningAlgorithm,

    /// Skip children that never apply instead of failing compilation.
    #[serde(default = "default_true")]
    pub skip_non_transformable: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            default_policy_combining: CombiningAlgorithm::default(),
            skip_non_transformable: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Request evaluation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EvaluationConfig {
    /// Batches at least this large are evaluated on the rayon pool.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_parallel_threshold() -> usize {
    64
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `midd_policy=debug`.
    #[serde(default)]
    pub filter: Option<String>,
}
