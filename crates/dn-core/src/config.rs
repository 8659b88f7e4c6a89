//! Generation configuration
//!
//! The full configuration surface of a run: iteration count, chain/join
//! length schedule, the two transition matrices, capacity ranges, fill
//! parameters and an optional seed. Validated as a whole before any node is
//! created.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generation::{CapacityProfile, FillParams, NodeKind};
use crate::matrix::{MatrixRole, TransitionMatrix};

/// Chain and join lengths per iteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthSchedule {
    /// One (chain length, join length) pair applied to every iteration
    Uniform { chain: u32, join: u32 },

    /// One pair per iteration index; must match the iteration count
    PerIteration(Vec<(u32, u32)>),
}

impl LengthSchedule {
    /// The (chain, join) lengths for iteration `i`
    pub fn for_iteration(&self, i: u32) -> (u32, u32) {
        match self {
            Self::Uniform { chain, join } => (*chain, *join),
            Self::PerIteration(pairs) => pairs.get(i as usize).copied().unwrap_or((0, 0)),
        }
    }
}

/// Everything a generation run is parameterized by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Number of grow/grow/join/saturate iterations
    pub iterations: u32,

    /// Chain and join lengths per iteration
    pub lengths: LengthSchedule,

    /// Matrix driving ordinary chain growth (room-biased)
    pub chain_matrix: TransitionMatrix,

    /// Matrix driving join growth (junction-biased)
    pub join_matrix: TransitionMatrix,

    /// Capacity sampling ranges for rooms and junctions
    pub capacities: CapacityProfile,

    /// Saturation-fill knobs
    pub fill: FillParams,

    /// Seed for the run; None draws one from entropy
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            iterations: 3,
            lengths: LengthSchedule::PerIteration(vec![(7, 4), (6, 3), (6, 3)]),
            chain_matrix: TransitionMatrix::chain_default(),
            join_matrix: TransitionMatrix::join_default(),
            capacities: CapacityProfile::default(),
            fill: FillParams::default(),
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Check the whole configuration; any failure aborts a run before it
    /// creates a single node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let LengthSchedule::PerIteration(pairs) = &self.lengths {
            if pairs.len() != self.iterations as usize {
                return Err(ConfigError::ScheduleMismatch {
                    declared: self.iterations as usize,
                    scheduled: pairs.len(),
                });
            }
        }
        self.chain_matrix.validate(MatrixRole::Chain)?;
        self.join_matrix.validate(MatrixRole::Join)?;
        if !self.capacities.room.is_valid() {
            return Err(ConfigError::EmptyCapacityRange {
                kind: NodeKind::Room,
                min: self.capacities.room.min,
                max: self.capacities.room.max,
            });
        }
        if !self.capacities.junction.is_valid() {
            return Err(ConfigError::EmptyCapacityRange {
                kind: NodeKind::Junction,
                min: self.capacities.junction.min,
                max: self.capacities.junction.max,
            });
        }
        Ok(())
    }
}
