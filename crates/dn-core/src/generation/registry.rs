//! Node registry
//!
//! A single append-only arena of every node created during a generation run.
//! Registration order drives sequential naming (`Room_1`, `Room_2`, ...), so
//! the registry is threaded explicitly through every growth call rather than
//! living in global state. Nodes are addressed by stable `NodeId` handles;
//! the arena never removes a node.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::node::{Node, NodeKind};

/// Stable handle into the node arena
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only arena of all nodes in a run, with a per-kind count index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    kind_counts: HashMap<NodeKind, u32>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the registry, assigning its identity.
    ///
    /// Unnamed nodes get the sequential identity `<Kind>_<count+1>` based on
    /// how many nodes of that kind were registered before them. Pre-named
    /// nodes (the entrance, the goal) keep their name but still bump the
    /// kind count, so sequential numbering stays collision-free.
    pub fn register(&mut self, mut node: Node) -> NodeId {
        let count = self.kind_counts.entry(node.kind).or_insert(0);
        *count += 1;
        if node.name.is_empty() {
            node.name = format!("{}_{}", node.kind, count);
        }
        debug_assert!(
            !self.nodes.iter().any(|n| n.name == node.name),
            "duplicate node identity {}",
            node.name
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// How many nodes of this kind have been registered
    pub fn count_of(&self, kind: NodeKind) -> u32 {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total number of registered nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fallible lookup for externally supplied handles
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Iterate over all nodes in registration order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// True when every identity in the registry is pairwise distinct
    pub fn identities_unique(&self) -> bool {
        let mut seen = hashbrown::HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|n| seen.insert(n.name.as_str()))
    }
}

impl Index<NodeId> for NodeRegistry {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeRegistry {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
