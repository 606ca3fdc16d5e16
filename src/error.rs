//! Error taxonomy for the assignment engine.
//!
//! Builder and solver errors are structural: upstream checks should make
//! them unreachable, but they are raised rather than defaulted. The
//! validator never raises; the lifecycle manager turns its output into
//! [`AssignError::Conflict`] only at mutation boundaries.

use uuid::Uuid;

use crate::models::{AssignmentStatus, Violation};

/// Errors produced by the assignment engine.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssignError {
    #[error("invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("cannot solve a zero-size cost matrix")]
    SingularMatrix,

    #[error("assignment conflict: {} violation(s)", violations.len())]
    Conflict { violations: Vec<Violation> },

    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: AssignmentStatus,
        to: AssignmentStatus,
    },

    #[error("assignment not found: {0}")]
    NotFound(Uuid),

    #[error("invalid cost at ({row}, {col}): {value}")]
    InvalidCost { row: usize, col: usize, value: f64 },

    #[error("cost matrix row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),
}

impl AssignError {
    /// Numeric code reported in response envelopes.
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidRoster { .. }
            | Self::InvalidCost { .. }
            | Self::NotSquare { .. }
            | Self::Config(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict { .. } => 409,
            Self::InvalidTransition { .. } => 422,
            Self::SingularMatrix | Self::Store(_) => 500,
        }
    }

    /// Human-readable violation messages carried by a conflict, if any.
    pub fn violation_messages(&self) -> Vec<String> {
        match self {
            Self::Conflict { violations } => violations.iter().map(|v| v.message.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Result type for engine operations.
pub type AssignResult<T> = std::result::Result<T, AssignError>;
