//! Presentation attribute mapping
//!
//! Pure data for a downstream renderer: per node, a shape bucketed by
//! capacity, a style reflecting saturation, and a qualitative color bucket
//! keyed by the growth step that produced the node. No drawing happens
//! here; generation never reads anything back from presentation.

use serde::{Deserialize, Serialize};

use crate::generation::{Node, NodeKind};

/// Renderer-agnostic node shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeShape {
    /// Corridors are drawn shapeless
    None,
    Square,
    Rect,
    InvTriangle,
    Diamond,
    House,
    /// Overflow bucket for capacities past the named shapes
    Circle,
}

/// Solid once saturated, dashed while slots remain free
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStyle {
    Solid,
    Dashed,
}

/// Shape for a node, bucketed by total capacity
pub fn shape_for(node: &Node) -> NodeShape {
    if node.kind == NodeKind::Corridor {
        return NodeShape::None;
    }
    match node.capacity {
        1 => NodeShape::Square,
        2 => NodeShape::Rect,
        3 => NodeShape::InvTriangle,
        4 => NodeShape::Diamond,
        5 => NodeShape::House,
        _ => NodeShape::Circle,
    }
}

/// Style for a node: dashed while it still has free capacity
pub fn style_for(node: &Node) -> NodeStyle {
    if node.has_free_slots() {
        NodeStyle::Dashed
    } else {
        NodeStyle::Solid
    }
}

/// Index into a qualitative palette for a growth step tag.
///
/// Only meaningful with qualitative palettes; `modulus` is the palette
/// size (zero is treated as 1).
pub fn color_bucket(chain_num: u32, modulus: u32) -> u32 {
    chain_num % modulus.max(1)
}
