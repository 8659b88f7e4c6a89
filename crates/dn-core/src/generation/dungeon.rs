//! Dungeon orchestration
//!
//! Drives the full generation run: N iterations of (grow chain A, grow
//! chain B, join A and B, saturate), composed into one connected multigraph,
//! then a short terminal chain ending in the distinguished goal room.

use core::fmt;

use serde::{Deserialize, Serialize};

use dn_rng::LayoutRng;

use crate::config::GenerationConfig;
use crate::error::GenerationError;

use super::chain::{grow_chain, join_chains, BUSY_CEILING};
use super::fill::saturate;
use super::graph::LayoutGraph;
use super::node::{Node, NodeKind};
use super::registry::{NodeId, NodeRegistry};

/// Growth steps per iteration (chain A, chain B, join); spaces the
/// chain_num tags so every step of every iteration gets its own tag
const CHAIN_STEPS: u32 = 3;

/// Which growth step of an iteration produced a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainRole {
    ChainA,
    ChainB,
    Join,
    Goal,
}

/// Label identifying one chain of a run for inspection and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainLabel {
    pub iteration: u32,
    pub role: ChainRole,
}

impl fmt::Display for ChainLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.role {
            ChainRole::ChainA => write!(f, "{}_C1", self.iteration),
            ChainRole::ChainB => write!(f, "{}_C2", self.iteration),
            ChainRole::Join => write!(f, "{}_J1", self.iteration),
            ChainRole::Goal => write!(f, "{}_G1", self.iteration),
        }
    }
}

/// The finished product of a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonLayout {
    /// Every node created during the run
    pub registry: NodeRegistry,

    /// The composed dungeon multigraph
    pub graph: LayoutGraph,

    /// The fixed entry room (capacity exactly 2)
    pub entrance: NodeId,

    /// The terminal room of the goal chain
    pub goal: NodeId,

    /// Every chain grown during the run, labeled by iteration and role
    pub chains: Vec<(ChainLabel, LayoutGraph)>,

    seed: u64,
}

impl DungeonLayout {
    /// The seed this layout was generated from; re-running with it
    /// reproduces the layout exactly
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Generate a complete dungeon layout from the given configuration.
///
/// Validates the configuration up front; no node is created if it is
/// malformed. Given the same seed and configuration the result is
/// identical across runs.
pub fn generate(config: &GenerationConfig) -> Result<DungeonLayout, GenerationError> {
    config.validate()?;
    let mut rng = match config.seed {
        Some(seed) => LayoutRng::new(seed),
        None => LayoutRng::from_entropy(),
    };

    let mut registry = NodeRegistry::new();
    let entrance = registry.register(Node::entrance());
    let mut dungeon = LayoutGraph::seeded(entrance);
    let mut chains = Vec::with_capacity(config.iterations as usize * 3 + 1);
    let mut goal_anchor = entrance;

    for i in 0..config.iterations {
        let (chain_len, join_len) = config.lengths.for_iteration(i);
        let start = if i == 0 {
            entrance
        } else {
            pick_start_node(&mut registry, entrance, &mut rng)
        };
        let tag = CHAIN_STEPS * i;

        let a = grow_chain(
            &mut registry,
            chain_len,
            &config.chain_matrix,
            &config.capacities,
            start,
            tag,
            &mut rng,
        )?;
        let b = grow_chain(
            &mut registry,
            chain_len,
            &config.chain_matrix,
            &config.capacities,
            start,
            tag + 1,
            &mut rng,
        )?;
        let join = join_chains(
            &mut registry,
            &a,
            &b,
            join_len,
            &config.join_matrix,
            &config.capacities,
            tag + 2,
            &mut rng,
            None,
            None,
            &[entrance],
        )?;
        goal_anchor = b.last().unwrap_or(start);

        dungeon.absorb(&a);
        dungeon.absorb(&b);
        dungeon.absorb(&join);
        saturate(
            &mut registry,
            &mut dungeon,
            &[entrance],
            config.fill,
            &config.chain_matrix,
            &config.capacities,
            tag + 2,
            &mut rng,
        )?;

        chains.push((ChainLabel { iteration: i, role: ChainRole::ChainA }, a));
        chains.push((ChainLabel { iteration: i, role: ChainRole::ChainB }, b));
        chains.push((ChainLabel { iteration: i, role: ChainRole::Join }, join));
    }

    // Terminal goal chain: a corridor off the final chain B's tail, ending
    // in the distinguished goal room.
    let tag = CHAIN_STEPS * config.iterations;
    let mut goal_chain = LayoutGraph::seeded(goal_anchor);
    if !registry[goal_anchor].has_free_slots() {
        registry[goal_anchor].force_extra_slot();
    }
    let mut corridor = Node::corridor();
    corridor.chain_num = tag;
    let c = registry.register(corridor);
    goal_chain.link(&mut registry, goal_anchor, c)?;
    let mut goal_room = Node::goal();
    goal_room.chain_num = tag;
    let goal = registry.register(goal_room);
    goal_chain.link(&mut registry, c, goal)?;
    dungeon.absorb(&goal_chain);
    chains.push((
        ChainLabel { iteration: config.iterations, role: ChainRole::Goal },
        goal_chain,
    ));

    Ok(DungeonLayout {
        registry,
        graph: dungeon,
        entrance,
        goal,
        chains,
        seed: rng.seed(),
    })
}

/// Pick the start node for an iteration after the first: a random
/// previously-registered non-corridor with free capacity and below the busy
/// ceiling. Relaxes to any non-corridor when nothing qualifies, and
/// guarantees at least two free slots so both chains can branch off it. The
/// entrance is never picked (its capacity stays fixed at 2); a registry
/// holding nothing else falls back to the entrance untouched.
fn pick_start_node(registry: &mut NodeRegistry, entrance: NodeId, rng: &mut LayoutRng) -> NodeId {
    let preferred: Vec<NodeId> = registry
        .iter()
        .filter(|&(id, n)| {
            id != entrance
                && n.kind != NodeKind::Corridor
                && n.has_free_slots()
                && n.capacity < BUSY_CEILING
        })
        .map(|(id, _)| id)
        .collect();
    let pick = rng.choose(&preferred).copied().or_else(|| {
        let relaxed: Vec<NodeId> = registry
            .iter()
            .filter(|&(id, n)| id != entrance && n.kind != NodeKind::Corridor)
            .map(|(id, _)| id)
            .collect();
        rng.choose(&relaxed).copied()
    });
    let Some(pick) = pick else {
        return entrance;
    };
    if registry[pick].free_slots() < 2 {
        registry[pick].force_extra_slots(2);
    }
    pick
}
