//! Error types for policy loading, compilation and request conversion.

use midd_config::ConfigError;
use midd_core::MiddError;
use thiserror::Error;

use crate::value::DataType;

/// Main error type for the policy layer.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Diagram construction failed.
    #[error(transparent)]
    Midd(#[from] MiddError),

    /// Engine configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A policy document file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A policy document is malformed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value's kind disagrees with its attribute's data type.
    #[error("Type mismatch for attribute '{attribute}': expected {expected}, found {found}")]
    TypeMismatch {
        attribute: String,
        expected: DataType,
        found: DataType,
    },

    /// A policy set declares no children.
    #[error("Policy set '{0}' has no children")]
    EmptyPolicySet(String),

    /// A request names an attribute no policy tests.
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
}

impl PolicyError {
    /// True when the element simply never applies.
    pub fn is_non_transformable(&self) -> bool {
        matches!(self, PolicyError::Midd(e) if e.is_non_transformable())
    }
}

impl From<toml::de::Error> for PolicyError {
    fn from(e: toml::de::Error) -> Self {
        PolicyError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for PolicyError {
    fn from(e: serde_yaml::Error) -> Self {
        PolicyError::Parse(e.to_string())
    }
}

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
