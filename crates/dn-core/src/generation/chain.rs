//! Chain growth and joining
//!
//! A chain is grown node-by-node from a seed: each step samples the next
//! node's kind from the transition matrix row of the current node, creates
//! it, wires a passage back to the previous node and advances. Corridors are
//! free connective tissue and do not count toward the requested length.
//!
//! Joining grows a bridging chain from a node of one graph and closes its
//! terminal onto a node of another, which is what turns two independently
//! grown structures into one connected dungeon.

use dn_rng::LayoutRng;

use crate::error::InvariantViolation;
use crate::matrix::TransitionMatrix;

use super::graph::LayoutGraph;
use super::node::{CapacityProfile, NodeKind};
use super::registry::{NodeId, NodeRegistry};

/// Junctions at or above this total capacity are passed over when picking
/// join endpoints; they are busy enough already.
pub const BUSY_CEILING: u32 = 5;

/// Grow a linear chain of `length` non-corridor nodes starting at `seed`.
///
/// The seed counts as the first non-corridor element, so `length <= 1` grows
/// nothing. Every new node is registered and connected to its predecessor,
/// filling one slot on each. A capacity-1 room sampled anywhere but the
/// terminal position is bumped to capacity 2 so the chain cannot dead-end
/// mid-way; only the terminal node may finish with unused capacity.
pub fn grow_chain(
    registry: &mut NodeRegistry,
    length: u32,
    matrix: &TransitionMatrix,
    caps: &CapacityProfile,
    seed: NodeId,
    chain_num: u32,
    rng: &mut LayoutRng,
) -> Result<LayoutGraph, InvariantViolation> {
    debug_assert!(registry.get(seed).is_some(), "seed node must be registered");
    let mut graph = LayoutGraph::seeded(seed);
    let mut prev = seed;
    let mut counted = 1u32;
    while counted < length {
        let kind = matrix.sample_next(registry[prev].kind, rng);
        let mut node = caps.instantiate(kind, rng);
        node.chain_num = chain_num;
        if node.kind == NodeKind::Room && node.capacity < 2 && counted + 1 < length {
            node.capacity = 2;
        }
        let id = registry.register(node);
        graph.link(registry, prev, id)?;
        if registry[id].kind != NodeKind::Corridor {
            counted += 1;
        }
        prev = id;
    }
    Ok(graph)
}

/// Grow a bridging chain that connects a node of `chain_a` to a node of
/// `chain_b`.
///
/// Endpoints default to a random pick per [`pick_endpoint`]; either can be
/// pinned by the caller. The bridge is grown from the start endpoint with
/// the (typically junction-biased) join matrix, then its terminal node is
/// wired to the end endpoint, forcing one extra capacity slot on any
/// saturated participant rather than failing.
///
/// Nodes in `exclude` are never picked as endpoints, which is how the
/// orchestrator keeps the entrance's capacity from ever being forced.
///
/// Self-joins (`chain_a` and `chain_b` the same graph) never close onto
/// their own origin: the start node is excluded from the end pick, and if
/// that leaves no candidate the grown chain simply hangs off the start with
/// no closing passage.
#[allow(clippy::too_many_arguments)]
pub fn join_chains(
    registry: &mut NodeRegistry,
    chain_a: &LayoutGraph,
    chain_b: &LayoutGraph,
    length: u32,
    matrix: &TransitionMatrix,
    caps: &CapacityProfile,
    chain_num: u32,
    rng: &mut LayoutRng,
    start: Option<NodeId>,
    end: Option<NodeId>,
    exclude: &[NodeId],
) -> Result<LayoutGraph, InvariantViolation> {
    let Some(start) = start.or_else(|| pick_endpoint(registry, chain_a, exclude, rng)) else {
        // Nothing to join from; an empty chain yields an empty bridge.
        return Ok(LayoutGraph::new());
    };
    let end = end.filter(|&id| id != start).or_else(|| {
        let mut barred = exclude.to_vec();
        barred.push(start);
        pick_endpoint(registry, chain_b, &barred, rng)
    });

    if !registry[start].has_free_slots() {
        registry[start].force_extra_slot();
    }
    let mut bridge = grow_chain(registry, length, matrix, caps, start, chain_num, rng)?;

    let Some(end) = end else {
        return Ok(bridge);
    };
    let terminal = bridge.last().unwrap_or(start);
    if !registry[terminal].has_free_slots() {
        registry[terminal].force_extra_slot();
    }
    if !registry[end].has_free_slots() {
        registry[end].force_extra_slot();
    }
    bridge.link(registry, terminal, end)?;
    Ok(bridge)
}

/// Pick a join endpoint from a graph's members.
///
/// Preference order: rooms and not-yet-busy junctions; then any
/// non-corridor; then any member at all (its capacity gets forced by the
/// caller). Relaxation instead of failure keeps the joiner total. Returns
/// None only when excluding `exclude` empties the graph.
pub(crate) fn pick_endpoint(
    registry: &NodeRegistry,
    graph: &LayoutGraph,
    exclude: &[NodeId],
    rng: &mut LayoutRng,
) -> Option<NodeId> {
    let eligible: Vec<NodeId> = graph
        .members()
        .iter()
        .copied()
        .filter(|id| !exclude.contains(id))
        .collect();

    let preferred: Vec<NodeId> = eligible
        .iter()
        .copied()
        .filter(|&id| {
            let node = &registry[id];
            node.kind == NodeKind::Room
                || (node.kind == NodeKind::Junction && node.capacity < BUSY_CEILING)
        })
        .collect();
    if let Some(&id) = rng.choose(&preferred) {
        return Some(id);
    }

    let relaxed: Vec<NodeId> = eligible
        .iter()
        .copied()
        .filter(|&id| registry[id].kind != NodeKind::Corridor)
        .collect();
    if let Some(&id) = rng.choose(&relaxed) {
        return Some(id);
    }

    rng.choose(&eligible).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::node::Node;
    use crate::matrix::MatrixRole;
    use crate::matrix::TransitionMatrix;

    /// room -> corridor -> room, junctions unreachable
    fn line_matrix() -> TransitionMatrix {
        TransitionMatrix::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    fn setup() -> (NodeRegistry, NodeId, LayoutRng) {
        let mut registry = NodeRegistry::new();
        let seed = registry.register(Node::entrance());
        (registry, seed, LayoutRng::new(11))
    }

    #[test]
    fn test_grow_counts_only_non_corridors() {
        let (mut registry, seed, mut rng) = setup();
        let caps = CapacityProfile::default();
        let chain = grow_chain(&mut registry, 3, &line_matrix(), &caps, seed, 0, &mut rng).unwrap();

        let rooms = chain
            .members()
            .iter()
            .filter(|&&id| registry[id].kind == NodeKind::Room)
            .count();
        let corridors = chain
            .members()
            .iter()
            .filter(|&&id| registry[id].kind == NodeKind::Corridor)
            .count();
        assert_eq!(rooms, 3);
        assert_eq!(corridors, 2);
        // A line: n nodes, n-1 passages
        assert_eq!(chain.passage_count(), chain.node_count() - 1);
    }

    #[test]
    fn test_grow_line_endpoints_keep_free_capacity() {
        let (mut registry, seed, mut rng) = setup();
        let caps = CapacityProfile::default();
        let chain = grow_chain(&mut registry, 3, &line_matrix(), &caps, seed, 0, &mut rng).unwrap();

        // First and last room each realized a single passage
        let first = chain.members().first().copied().unwrap();
        let last = chain.last().unwrap();
        assert_eq!(registry[first].filled, 1);
        assert_eq!(registry[last].filled, 1);
    }

    #[test]
    fn test_grow_no_mid_chain_dead_ends() {
        let (mut registry, seed, mut rng) = setup();
        // Capacity-1 rooms whenever the range allows it
        let caps = CapacityProfile {
            room: crate::generation::CapacityRange::new(1, 1),
            junction: crate::generation::CapacityRange::new(3, 3),
        };
        let chain = grow_chain(&mut registry, 5, &line_matrix(), &caps, seed, 0, &mut rng).unwrap();

        let members = chain.members();
        for &id in &members[..members.len() - 1] {
            let node = &registry[id];
            assert!(
                node.capacity >= 2,
                "mid-chain node {} may not be a dead end",
                node.desc()
            );
        }
        // The terminal room kept its sampled capacity of 1
        assert_eq!(registry[chain.last().unwrap()].capacity, 1);
    }

    #[test]
    fn test_grow_length_one_is_seed_only() {
        let (mut registry, seed, mut rng) = setup();
        let caps = CapacityProfile::default();
        let chain = grow_chain(&mut registry, 1, &line_matrix(), &caps, seed, 0, &mut rng).unwrap();
        assert_eq!(chain.node_count(), 1);
        assert_eq!(chain.passage_count(), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_join_connects_two_chains() {
        let (mut registry, seed, mut rng) = setup();
        let caps = CapacityProfile::default();
        let matrix = line_matrix();
        let a = grow_chain(&mut registry, 3, &matrix, &caps, seed, 0, &mut rng).unwrap();
        let b_seed = registry.register(Node::room(3));
        let b = grow_chain(&mut registry, 3, &matrix, &caps, b_seed, 1, &mut rng).unwrap();

        let join_matrix = TransitionMatrix::join_default()
            .normalized(MatrixRole::Join)
            .unwrap();
        let bridge = join_chains(
            &mut registry, &a, &b, 2, &join_matrix, &caps, 2, &mut rng, None, None, &[],
        )
        .unwrap();

        let mut composed = LayoutGraph::new();
        composed.absorb(&a);
        composed.absorb(&b);
        composed.absorb(&bridge);
        assert!(composed.is_reachable(seed, b_seed));
    }

    #[test]
    fn test_join_forces_capacity_on_saturated_endpoints() {
        let mut registry = NodeRegistry::new();
        let mut rng = LayoutRng::new(5);
        let caps = CapacityProfile::default();

        // Two saturated single-room chains
        let a_seed = registry.register(Node::room(1));
        let b_seed = registry.register(Node::room(1));
        let mut pre = LayoutGraph::new();
        pre.link(&mut registry, a_seed, b_seed).unwrap();
        assert!(registry[a_seed].is_saturated());
        assert!(registry[b_seed].is_saturated());

        let a = LayoutGraph::seeded(a_seed);
        let b = LayoutGraph::seeded(b_seed);
        let bridge = join_chains(
            &mut registry,
            &a,
            &b,
            1,
            &line_matrix(),
            &caps,
            0,
            &mut rng,
            Some(a_seed),
            Some(b_seed),
            &[],
        )
        .unwrap();

        // Direct passage after forcing one slot on each endpoint
        assert_eq!(bridge.passage_count(), 1);
        assert!(registry[a_seed].filled <= registry[a_seed].capacity);
        assert!(registry[b_seed].filled <= registry[b_seed].capacity);
        assert_eq!(registry[a_seed].capacity, 2);
        assert_eq!(registry[b_seed].capacity, 2);
    }

    #[test]
    fn test_self_join_never_closes_onto_its_origin() {
        let mut registry = NodeRegistry::new();
        let mut rng = LayoutRng::new(9);
        let caps = CapacityProfile::default();

        let only = registry.register(Node::room(4));
        let graph = LayoutGraph::seeded(only);
        let bridge = join_chains(
            &mut registry,
            &graph,
            &graph,
            2,
            &line_matrix(),
            &caps,
            0,
            &mut rng,
            Some(only),
            None,
            &[],
        )
        .unwrap();

        // No candidate besides the origin: the chain hangs off it unclosed,
        // and no arc loops back to the origin from itself.
        assert!(bridge.arcs().iter().all(|(a, b)| a != b));
        let origin_passages = bridge
            .arcs()
            .iter()
            .filter(|(from, to)| *from == only || *to == only)
            .count();
        assert_eq!(origin_passages, 2); // one passage, both arc directions
    }

    #[test]
    fn test_join_endpoint_prefers_quiet_nodes() {
        let mut registry = NodeRegistry::new();
        let mut rng = LayoutRng::new(3);

        let busy = registry.register(Node::junction(6));
        let quiet = registry.register(Node::room(2));
        let mut graph = LayoutGraph::seeded(busy);
        graph.add_member(quiet);

        for _ in 0..50 {
            let picked = pick_endpoint(&registry, &graph, &[], &mut rng).unwrap();
            assert_eq!(picked, quiet);
        }
    }

    #[test]
    fn test_join_endpoint_relaxes_to_corridors_last() {
        let mut registry = NodeRegistry::new();
        let mut rng = LayoutRng::new(3);

        let corridor = registry.register(Node::corridor());
        let graph = LayoutGraph::seeded(corridor);
        let picked = pick_endpoint(&registry, &graph, &[], &mut rng);
        assert_eq!(picked, Some(corridor));
        assert_eq!(pick_endpoint(&registry, &graph, &[corridor], &mut rng), None);
    }
}
