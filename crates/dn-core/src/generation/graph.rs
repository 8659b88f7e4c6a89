//! Layout multigraph
//!
//! One graph type serves both roles the engine needs: the chain produced by
//! a single growth call, and the composed dungeon built from many of them.
//! Members are kept in insertion order (growth order matters to the joiner
//! and the tests); a passage is stored as its two directed arcs so that
//! downstream directional representations get both orientations for free.
//! Passage bookkeeping happens in exactly one place: `link`.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;

use super::registry::{NodeId, NodeRegistry};

/// A connected multigraph over arena node handles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutGraph {
    members: Vec<NodeId>,
    member_set: HashSet<NodeId>,
    arcs: Vec<(NodeId, NodeId)>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// A graph holding a single seed node and no passages
    pub fn seeded(seed: NodeId) -> Self {
        let mut graph = Self::new();
        graph.add_member(seed);
        graph
    }

    /// Add a node to the membership; a no-op if already present
    pub fn add_member(&mut self, id: NodeId) {
        if self.member_set.insert(id) {
            self.members.push(id);
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.member_set.contains(&id)
    }

    /// Members in insertion order
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    /// The most recently added member, i.e. a chain's terminal node
    pub fn last(&self) -> Option<NodeId> {
        self.members.last().copied()
    }

    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    /// Directed arcs; every passage contributes two
    pub fn arcs(&self) -> &[(NodeId, NodeId)] {
        &self.arcs
    }

    /// Number of undirected passages
    pub fn passage_count(&self) -> usize {
        self.arcs.len() / 2
    }

    /// Create a passage between two distinct members.
    ///
    /// Adds both endpoints to the membership, records both directed arcs and
    /// increments `filled` on both nodes. Fails if either endpoint has no
    /// free slot; callers force extra capacity first when that is the
    /// intended policy.
    pub fn link(
        &mut self,
        registry: &mut NodeRegistry,
        a: NodeId,
        b: NodeId,
    ) -> Result<(), InvariantViolation> {
        if a == b {
            let name = registry
                .get(a)
                .map(|n| n.name.clone())
                .unwrap_or_default();
            return Err(InvariantViolation::SelfPassage { name });
        }
        for id in [a, b] {
            let node = registry
                .get(id)
                .ok_or(InvariantViolation::UnknownNode { id })?;
            if !node.has_free_slots() {
                return Err(InvariantViolation::CapacityExceeded {
                    name: node.name.clone(),
                    filled: node.filled + 1,
                    capacity: node.capacity,
                });
            }
        }
        self.add_member(a);
        self.add_member(b);
        registry[a].filled += 1;
        registry[b].filled += 1;
        self.arcs.push((a, b));
        self.arcs.push((b, a));
        Ok(())
    }

    /// Union another graph's members and arcs into this one.
    ///
    /// Shared members are deduplicated; arcs concatenate, which preserves
    /// multi-passages between the same pair of nodes.
    pub fn absorb(&mut self, other: &LayoutGraph) {
        for &id in &other.members {
            self.add_member(id);
        }
        self.arcs.extend_from_slice(&other.arcs);
    }

    /// Out-neighbors of a node, one entry per arc
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.arcs
            .iter()
            .filter(move |(from, _)| *from == id)
            .map(|(_, to)| *to)
    }

    /// Whether `to` can be reached from `from` along passages (BFS)
    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return self.contains(from);
        }
        let mut visited = HashSet::new();
        let mut queue = std::collections::VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        while let Some(current) = queue.pop_front() {
            for next in self.neighbors(current) {
                if next == to {
                    return true;
                }
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// Members that still have unused capacity, in insertion order
    pub fn undersaturated(&self, registry: &NodeRegistry) -> Vec<NodeId> {
        self.members
            .iter()
            .copied()
            .filter(|&id| registry[id].has_free_slots())
            .collect()
    }
}
