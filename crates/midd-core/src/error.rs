//! Error types for diagram construction.

use thiserror::Error;

/// Main error type for interval and diagram operations.
///
/// Every variant is raised while a diagram is being built. Evaluation of a
/// finished diagram never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiddError {
    /// An interval violates the ordering or closed-at-infinity invariant.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// `include_bound` was called on a pair it cannot merge.
    #[error("Invalid merge: {0}")]
    InvalidMerge(String),

    /// An interval unbounded on both sides has no value to take a type from.
    #[error("Missing type: interval (-inf, +inf) carries no finite bound")]
    MissingType,

    /// Unknown combining algorithm identifier.
    #[error("Unsupported combining algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The element reduces to a diagram with no applicable terminal.
    #[error("Non-transformable element: {0}")]
    NonTransformable(String),

    /// An internal node tests a variable that does not precede its
    /// children's variables.
    #[error("Variable order violated: node on x{parent} has a child on x{child}")]
    VariableOrder { parent: u32, child: u32 },

    /// A node handle that does not belong to the store it was used with.
    #[error("Unknown node: {0}")]
    UnknownNode(u32),
}

impl MiddError {
    /// Returns true for outcomes that mean "contributes nothing" rather than
    /// a construction failure.
    pub fn is_non_transformable(&self) -> bool {
        matches!(self, MiddError::NonTransformable(_))
    }
}

/// Result type alias for diagram operations.
pub type Result<T> = std::result::Result<T, MiddError>;
