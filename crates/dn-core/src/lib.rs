//! dn-core: level-layout graph generation for dungeon-net
//!
//! Procedurally generates a connected level-layout graph: typed nodes
//! (rooms, corridors, junctions) linked by bidirectional passages, grown
//! stochastically from an entrance until every node's connection budget is
//! satisfied and a goal node is reachable. Pure topology; no tiles, no
//! coordinates, no I/O. Deterministic given a fixed seed.

pub mod config;
pub mod error;
pub mod generation;
pub mod matrix;
pub mod viz;

pub use config::{GenerationConfig, LengthSchedule};
pub use error::{ConfigError, GenerationError, InvariantViolation};
pub use generation::{
    generate, grow_chain, join_chains, saturate, CapacityProfile, CapacityRange, ChainLabel,
    ChainRole, DungeonLayout, FillParams, LayoutGraph, Node, NodeId, NodeKind, NodeRegistry,
};
pub use matrix::{MatrixRole, TransitionMatrix};
