//! Node model
//!
//! The typed entities a layout graph is made of. A node knows nothing about
//! geometry; it only tracks how many passages it may have and how many it
//! already has.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use dn_rng::LayoutRng;

/// Node variants
///
/// Declaration order is the canonical ordering used to index transition
/// matrix rows and columns.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumCount, EnumIter,
)]
#[repr(u8)]
pub enum NodeKind {
    /// A room, 1 or more passages
    Room = 0,
    /// A pass-through segment, always exactly 2 passages
    Corridor = 1,
    /// A branching point, 3 or more passages
    Junction = 2,
}

impl NodeKind {
    /// Row/column index of this kind in a transition matrix
    pub fn row(self) -> usize {
        self as usize
    }
}

/// A single layout node with passage-capacity bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Variant tag
    pub kind: NodeKind,

    /// Total number of passages this node may have
    pub capacity: u32,

    /// Number of passages currently realized
    pub filled: u32,

    /// Globally unique label, assigned once at registration
    pub name: String,

    /// Which growth step produced this node (presentation only)
    pub chain_num: u32,
}

impl Node {
    /// Create a room; capacity floors at 1
    pub fn room(capacity: u32) -> Self {
        Self::with_capacity(NodeKind::Room, capacity.max(1))
    }

    /// Create a corridor; capacity is always exactly 2
    pub fn corridor() -> Self {
        Self::with_capacity(NodeKind::Corridor, 2)
    }

    /// Create a junction; capacity floors at 3
    pub fn junction(capacity: u32) -> Self {
        Self::with_capacity(NodeKind::Junction, capacity.max(3))
    }

    fn with_capacity(kind: NodeKind, capacity: u32) -> Self {
        Self {
            kind,
            capacity,
            filled: 0,
            name: String::new(),
            chain_num: 0,
        }
    }

    /// The distinguished entrance: a room with capacity fixed at 2
    pub fn entrance() -> Self {
        let mut node = Self::room(2);
        node.name = "Entrance".to_string();
        node
    }

    /// The distinguished goal: a dead-end room, saturated by its one passage
    pub fn goal() -> Self {
        let mut node = Self::room(1);
        node.name = "Goal".to_string();
        node
    }

    /// Whether another passage can attach without forcing capacity
    pub fn has_free_slots(&self) -> bool {
        self.filled < self.capacity
    }

    /// Number of unrealized passage slots
    pub fn free_slots(&self) -> u32 {
        self.capacity - self.filled
    }

    /// Whether every slot is realized
    pub fn is_saturated(&self) -> bool {
        self.filled == self.capacity
    }

    /// Grow capacity by one to make room for a passage a saturated node
    /// would otherwise reject. Unbounded across a run; see DESIGN.md.
    pub fn force_extra_slot(&mut self) {
        self.capacity += 1;
    }

    /// Grow capacity by n slots
    pub fn force_extra_slots(&mut self, n: u32) {
        self.capacity += n;
    }

    /// Debug description: `Name (Kind) (filled/capacity)`
    pub fn desc(&self) -> String {
        format!(
            "{} ({}) ({}/{} filled)",
            self.name, self.kind, self.filled, self.capacity
        )
    }
}

/// Inclusive capacity sampling range for randomly instantiated nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityRange {
    pub min: u32,
    pub max: u32,
}

impl CapacityRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Draw a capacity from the range
    pub fn sample(&self, rng: &mut LayoutRng) -> u32 {
        rng.range_inclusive(self.min, self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min >= 1 && self.min <= self.max
    }
}

/// Per-kind capacity ranges used when a random walk instantiates a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityProfile {
    pub room: CapacityRange,
    pub junction: CapacityRange,
}

impl Default for CapacityProfile {
    fn default() -> Self {
        Self {
            room: CapacityRange::new(1, 4),
            junction: CapacityRange::new(3, 6),
        }
    }
}

impl CapacityProfile {
    /// Instantiate a node of the given kind, sampling capacity where the
    /// kind allows it. Corridors are always capacity 2.
    pub fn instantiate(&self, kind: NodeKind, rng: &mut LayoutRng) -> Node {
        match kind {
            NodeKind::Room => Node::room(self.room.sample(rng)),
            NodeKind::Corridor => Node::corridor(),
            NodeKind::Junction => Node::junction(self.junction.sample(rng)),
        }
    }
}
