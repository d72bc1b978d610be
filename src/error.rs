//! Error types for the bee colony optimizer.
//!
//! Two families of failure exist:
//!
//! - **Configuration errors** are raised by [`AbcConfig::validate`] and by
//!   [`ArtificialBeeColony::new`] before any objective evaluation happens.
//! - **Evaluation errors** are raised during a run when the objective fails
//!   or returns a non-finite value. They abort the run; no fallback fitness
//!   is ever substituted.
//!
//! [`AbcConfig::validate`]: crate::abc::AbcConfig::validate
//! [`ArtificialBeeColony::new`]: crate::abc::ArtificialBeeColony::new

use thiserror::Error;

/// Error reported by a user-supplied objective function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ObjectiveError(pub String);

impl ObjectiveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors produced while configuring or running a colony.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbcError {
    /// A scalar parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A bounds pair is empty, inverted, or not finite.
    #[error("invalid bounds in dimension {dim}: lower={lower}, upper={upper}")]
    InvalidBounds { dim: usize, lower: f64, upper: f64 },

    /// A vector does not have the problem's dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A strategy was requested by a name that does not exist.
    #[error("unknown {kind} strategy: {name:?}")]
    UnknownStrategy { kind: &'static str, name: String },

    /// The objective returned NaN or an infinity.
    #[error("objective returned non-finite value {value} at {position:?}")]
    NonFiniteObjective { value: f64, position: Vec<f64> },

    /// The objective itself reported a failure.
    #[error("objective evaluation failed: {0}")]
    Objective(#[from] ObjectiveError),
}

impl AbcError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        AbcError::InvalidConfig(message.into())
    }

    /// Whether this error was detected before the run started.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AbcError::InvalidConfig(_)
                | AbcError::InvalidBounds { .. }
                | AbcError::DimensionMismatch { .. }
                | AbcError::UnknownStrategy { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AbcError>;
