//! Chain-growth generation
//!
//! Contains the node model, the registry arena, the layout multigraph, and
//! the growth algorithms that build a dungeon out of them.

mod chain;
mod dungeon;
mod fill;
mod graph;
mod node;
mod registry;

pub use chain::{grow_chain, join_chains, BUSY_CEILING};
pub use dungeon::{generate, ChainLabel, ChainRole, DungeonLayout};
pub use fill::{saturate, FillParams};
pub use graph::LayoutGraph;
pub use node::{CapacityProfile, CapacityRange, Node, NodeKind};
pub use registry::{NodeId, NodeRegistry};
