//! Error types for layout generation
//!
//! Two fatal families: configuration problems detected before any node is
//! created, and internal consistency failures that indicate a defect in the
//! engine itself. Candidate-selection dead ends are not errors; they are
//! recovered locally by relaxing the selection predicate.

use thiserror::Error;

use crate::generation::{NodeId, NodeKind};
use crate::matrix::MatrixRole;

/// Malformed generation configuration; aborts a run before any node exists
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("transition matrix is {rows}x{cols}, expected {expected}x{expected}")]
    NotSquare {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    #[error("{role} matrix row {row} ({kind}) sums to {sum}, expected 1")]
    RowNotStochastic {
        role: MatrixRole,
        row: usize,
        kind: NodeKind,
        sum: f64,
    },

    #[error("{role} matrix row {row} ({kind}) has no positive entries")]
    ZeroMatrixRow {
        role: MatrixRole,
        row: usize,
        kind: NodeKind,
    },

    #[error("length schedule covers {scheduled} iterations but {declared} were requested")]
    ScheduleMismatch { declared: usize, scheduled: usize },

    #[error("capacity range for {kind} is invalid: min {min}, max {max}")]
    EmptyCapacityRange { kind: NodeKind, min: u32, max: u32 },
}

/// Internal consistency failure; never clamped, never recovered
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("passage would fill node {name} beyond capacity ({filled}/{capacity})")]
    CapacityExceeded {
        name: String,
        filled: u32,
        capacity: u32,
    },

    #[error("passage endpoints must differ: {name}")]
    SelfPassage { name: String },

    #[error("unknown node handle {id:?}")]
    UnknownNode { id: NodeId },
}

/// Top-level error for a generation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
