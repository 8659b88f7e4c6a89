//! Saturation filling
//!
//! Eliminates leftover free capacity by attaching short sub-chains to every
//! under-saturated node. The original formulation is recursive; here it runs
//! as an explicit worklist so deep fills cannot grow the call stack, while
//! keeping the same annealing schedule: each generation of work gets less
//! complex, loopier and shallower until only dead-end rooms are attached.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use dn_rng::LayoutRng;

use crate::error::InvariantViolation;
use crate::matrix::TransitionMatrix;

use super::chain::{grow_chain, join_chains};
use super::graph::LayoutGraph;
use super::node::{CapacityProfile, Node};
use super::registry::{NodeId, NodeRegistry};

/// Knobs controlling how aggressively free capacity is filled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillParams {
    /// Upper bound on sub-chain length; 1 means dead-end rooms only
    pub max_depth: u32,

    /// Scale factor on sampled sub-chain lengths; higher means more
    /// structure per fill
    pub complexity: f64,

    /// Probability that a sub-growth loops back into the graph instead of
    /// branching off linearly
    pub self_loop_prob: f64,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            complexity: 0.5,
            self_loop_prob: 0.1,
        }
    }
}

impl FillParams {
    /// The annealing step applied to each next generation of fill work.
    ///
    /// Depth is monotonically decreasing and floors at 1, which is what
    /// bounds the whole fill: once depth hits 1 every remaining slot is
    /// resolved by a single dead-end attachment.
    pub fn decayed(self) -> Self {
        Self {
            max_depth: self.max_depth.saturating_sub(2).max(1),
            complexity: self.complexity * 0.95,
            self_loop_prob: self.self_loop_prob * 1.05,
        }
    }
}

/// Attach sub-chains to every under-saturated node of `graph` until no node
/// has unused capacity.
///
/// Nodes listed in `exclude` are never filled (the entrance keeps its free
/// slots). New nodes created by a fill are themselves queued for filling
/// under the decayed parameters, so the process converges to short dead-end
/// branches.
#[allow(clippy::too_many_arguments)]
pub fn saturate(
    registry: &mut NodeRegistry,
    graph: &mut LayoutGraph,
    exclude: &[NodeId],
    params: FillParams,
    matrix: &TransitionMatrix,
    caps: &CapacityProfile,
    chain_num: u32,
    rng: &mut LayoutRng,
) -> Result<(), InvariantViolation> {
    let mut worklist: VecDeque<(NodeId, FillParams)> = graph
        .undersaturated(registry)
        .into_iter()
        .filter(|id| !exclude.contains(id))
        .map(|id| (id, params))
        .collect();

    while let Some((node, p)) = worklist.pop_front() {
        if registry[node].is_saturated() {
            continue;
        }
        if p.max_depth <= 1 {
            cap_with_dead_ends(registry, graph, node, chain_num)?;
            continue;
        }

        let scaled = (rng.range_inclusive(1, p.max_depth - 1) as f64 * p.complexity) as u32;
        let sub_length = scaled.max(1);
        let sub = if rng.chance(p.self_loop_prob) {
            join_chains(
                registry,
                graph,
                graph,
                sub_length,
                matrix,
                caps,
                chain_num,
                rng,
                Some(node),
                None,
                exclude,
            )?
        } else {
            grow_chain(registry, sub_length, matrix, caps, node, chain_num, rng)?
        };

        let next = p.decayed();
        for id in sub.undersaturated(registry) {
            if !exclude.contains(&id) {
                worklist.push_back((id, next));
            }
        }
        graph.absorb(&sub);
    }
    Ok(())
}

/// Depth-1 base case: resolve every free slot with a capacity-1 dead-end
/// room. Each attachment consumes exactly one slot, so this terminates.
fn cap_with_dead_ends(
    registry: &mut NodeRegistry,
    graph: &mut LayoutGraph,
    node: NodeId,
    chain_num: u32,
) -> Result<(), InvariantViolation> {
    while registry[node].has_free_slots() {
        let mut room = Node::room(1);
        room.chain_num = chain_num;
        let id = registry.register(room);
        graph.link(registry, node, id)?;
    }
    Ok(())
}
