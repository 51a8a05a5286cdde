//! Error types
//!
//! Every failure is reported where it is detected: when a boundary
//! specification is built, when a virtual point is resolved, or when an
//! operator is applied. Nothing is retried, the inputs are deterministic.

use thiserror::Error;

/// Errors raised while building boundary conditions or applying operators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OperatorError {
    /// Malformed or inconsistent boundary specification
    #[error("invalid boundary condition: {0}")]
    InvalidCondition(String),

    /// Mixed condition whose coefficient makes the virtual point singular
    #[error("degenerate mixed condition: 2 + c·Δ = {denominator:e} (c = {coefficient}, Δ = {spacing})")]
    DegenerateCondition {
        coefficient: f64,
        spacing: f64,
        denominator: f64,
    },

    /// Operator (or operator/geometry pairing) that is not implemented
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// Field shape or rank does not fit the grid or the operator
    #[error("shape mismatch: expected {expected}, got {found}")]
    ShapeMismatch { expected: String, found: String },

    /// Axis metadata violating `N ≥ 1`, `Δ > 0` or `r0 ≥ 0`
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
}

impl OperatorError {
    pub(crate) fn invalid_condition(message: impl Into<String>) -> Self {
        Self::InvalidCondition(message.into())
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperator(message.into())
    }

    pub(crate) fn shape_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, OperatorError>;
