//! Shared base types for the IR arena (`NodeIndex`, `NodeList`, `TypeId`).

use serde::{Deserialize, Serialize};

/// Index of a node in the arena.
///
/// Indices are cheap to copy (just a u32) and compare with `==` in O(1).
/// `NodeIndex::NONE` is the sentinel for "no node" (absent body, absent
/// initializer, absent receiver).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Sentinel value representing the absence of a node.
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn new(index: u32) -> NodeIndex {
        NodeIndex(index)
    }

    /// Check if this is the none/absent sentinel.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ordered list of node indices (members, parameters, statements).
///
/// Order is significant everywhere it appears: member lists are declaration
/// order, statement lists are execution order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> NodeList {
        NodeList { nodes: Vec::new() }
    }

    pub fn from_vec(nodes: Vec<NodeIndex>) -> NodeList {
        NodeList { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Index of a type in the arena's type pool.
///
/// `TypeId::UNIT` is pre-interned; class types are interned when the class
/// declaration is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// The unit type, always present at slot 0.
    pub const UNIT: TypeId = TypeId(0);

    #[inline]
    pub fn new(index: u32) -> TypeId {
        TypeId(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
