//! Transition probability matrix
//!
//! A square, row-stochastic matrix over the canonical `NodeKind` order.
//! Entry (i, j) is the probability that a node of kind i is followed by a
//! newly created node of kind j during a random walk. Two roles exist: the
//! chain matrix biases toward rooms (long habitable paths), the join matrix
//! biases toward junctions so bridges spend few rooms.

use core::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

use dn_rng::LayoutRng;

use crate::error::ConfigError;
use crate::generation::NodeKind;

/// Tolerance for a row sum to count as 1
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Which of the two configured matrices an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixRole {
    Chain,
    Join,
}

impl fmt::Display for MatrixRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain => write!(f, "chain"),
            Self::Join => write!(f, "join"),
        }
    }
}

/// Row-stochastic kind-transition matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    rows: Vec<Vec<f64>>,
}

impl TransitionMatrix {
    /// Build a matrix from rows in canonical `NodeKind` order.
    ///
    /// Checks shape only; call [`normalized`](Self::normalized) or
    /// [`validate`](Self::validate) before sampling from it.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let expected = NodeKind::COUNT;
        if rows.len() != expected {
            return Err(ConfigError::NotSquare {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
                expected,
            });
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != expected) {
            return Err(ConfigError::NotSquare {
                rows: rows.len(),
                cols: bad.len(),
                expected,
            });
        }
        Ok(Self { rows })
    }

    /// Divide each row by its sum. Idempotent on already-normalized rows.
    ///
    /// A row with no positive mass cannot be normalized and is a fatal
    /// configuration error.
    pub fn normalized(&self, role: MatrixRole) -> Result<Self, ConfigError> {
        let mut rows = self.rows.clone();
        for (i, row) in rows.iter_mut().enumerate() {
            let sum: f64 = row.iter().sum();
            if sum <= 0.0 {
                return Err(ConfigError::ZeroMatrixRow {
                    role,
                    row: i,
                    kind: kind_for_row(i),
                });
            }
            for entry in row.iter_mut() {
                *entry /= sum;
            }
        }
        Ok(Self { rows })
    }

    /// Check that every row sums to 1 within [`ROW_SUM_TOLERANCE`]
    pub fn validate(&self, role: MatrixRole) -> Result<(), ConfigError> {
        for (i, row) in self.rows.iter().enumerate() {
            if !row.iter().any(|w| *w > 0.0) {
                return Err(ConfigError::ZeroMatrixRow {
                    role,
                    row: i,
                    kind: kind_for_row(i),
                });
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(ConfigError::RowNotStochastic {
                    role,
                    row: i,
                    kind: kind_for_row(i),
                    sum,
                });
            }
        }
        Ok(())
    }

    /// Row of transition probabilities out of the given kind
    pub fn row(&self, from: NodeKind) -> &[f64] {
        &self.rows[from.row()]
    }

    /// Sample the kind of the next node in a walk.
    ///
    /// Assumes a validated matrix; on a degenerate row the draw resolves to
    /// the heaviest entry rather than clamping any bookkeeping.
    pub fn sample_next(&self, from: NodeKind, rng: &mut LayoutRng) -> NodeKind {
        let row = &self.rows[from.row()];
        let idx = rng.weighted_index(row).unwrap_or_else(|| heaviest(row));
        kind_for_row(idx)
    }

    /// The default chain-growth matrix: rooms and corridors alternate, with
    /// an occasional junction after a corridor.
    pub fn chain_default() -> Self {
        Self {
            rows: vec![
                vec![0.0, 1.0, 0.0], // room -> corridor
                vec![0.9, 0.0, 0.1], // corridor -> room | junction
                vec![0.0, 1.0, 0.0], // junction -> corridor
            ],
        }
    }

    /// The default join-growth matrix: junction-heavy, minimizing rooms
    /// spent on bridges.
    pub fn join_default() -> Self {
        Self {
            rows: vec![
                vec![0.0, 1.0, 0.0], // room -> corridor
                vec![0.3, 0.0, 0.7], // corridor -> room | junction
                vec![0.0, 1.0, 0.0], // junction -> corridor
            ],
        }
    }
}

fn kind_for_row(idx: usize) -> NodeKind {
    NodeKind::iter().nth(idx).unwrap_or(NodeKind::Room)
}

fn heaviest(row: &[f64]) -> usize {
    row.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_bad_shape() {
        let err = TransitionMatrix::from_rows(vec![vec![1.0, 0.0]]).unwrap_err();
        assert!(matches!(err, ConfigError::NotSquare { .. }));

        let err = TransitionMatrix::from_rows(vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotSquare { cols: 2, .. }));
    }

    #[test]
    fn test_normalize_divides_rows() {
        let matrix = TransitionMatrix::from_rows(vec![
            vec![2.0, 2.0, 0.0],
            vec![0.0, 1.0, 3.0],
            vec![5.0, 0.0, 0.0],
        ])
        .unwrap();
        let normalized = matrix.normalized(MatrixRole::Chain).unwrap();
        assert_eq!(normalized.row(NodeKind::Room), &[0.5, 0.5, 0.0]);
        assert_eq!(normalized.row(NodeKind::Corridor), &[0.0, 0.25, 0.75]);
        assert_eq!(normalized.row(NodeKind::Junction), &[1.0, 0.0, 0.0]);
        assert!(normalized.validate(MatrixRole::Chain).is_ok());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let matrix = TransitionMatrix::chain_default();
        let once = matrix.normalized(MatrixRole::Chain).unwrap();
        let twice = once.normalized(MatrixRole::Chain).unwrap();
        for kind in [NodeKind::Room, NodeKind::Corridor, NodeKind::Junction] {
            for (a, b) in once.row(kind).iter().zip(twice.row(kind)) {
                assert!((a - b).abs() <= ROW_SUM_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_normalize_rejects_zero_row() {
        let matrix = TransitionMatrix::from_rows(vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
        ])
        .unwrap();
        let err = matrix.normalized(MatrixRole::Join).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ZeroMatrixRow {
                role: MatrixRole::Join,
                row: 0,
                kind: NodeKind::Room,
            }
        );
    }

    #[test]
    fn test_validate_catches_unnormalized_row() {
        let matrix = TransitionMatrix::from_rows(vec![
            vec![0.0, 2.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap();
        let err = matrix.validate(MatrixRole::Chain).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RowNotStochastic { row: 0, sum, .. } if (sum - 2.0).abs() < 1e-12
        ));
    }

    #[test]
    fn test_defaults_are_stochastic() {
        assert!(TransitionMatrix::chain_default().validate(MatrixRole::Chain).is_ok());
        assert!(TransitionMatrix::join_default().validate(MatrixRole::Join).is_ok());
    }

    #[test]
    fn test_sample_follows_deterministic_rows() {
        let mut rng = LayoutRng::new(1);
        let matrix = TransitionMatrix::chain_default();
        for _ in 0..50 {
            assert_eq!(matrix.sample_next(NodeKind::Room, &mut rng), NodeKind::Corridor);
            assert_eq!(matrix.sample_next(NodeKind::Junction, &mut rng), NodeKind::Corridor);
            // corridor row is stochastic but never yields another corridor
            assert_ne!(matrix.sample_next(NodeKind::Corridor, &mut rng), NodeKind::Corridor);
        }
    }
}
