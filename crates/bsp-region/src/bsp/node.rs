//! BSP tree node storage.

use std::fmt;

use super::hyperplane::Hyperplane;

/// Handle of a node inside a [`BspTree`](super::BspTree) arena.
///
/// Handles are only meaningful for the tree that produced them. Node
/// identity is handle identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Index of the node in its arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute slot carried by every node.
///
/// In a region tree, leaves carry [`Attribute::Inside`] and internal nodes
/// start [`Attribute::Absent`], gaining [`Attribute::Boundary`] once the
/// boundary has been characterized.
#[derive(Debug, Clone)]
pub enum Attribute<H: Hyperplane> {
    /// No attribute.
    Absent,
    /// Leaf flag: `true` for an inside cell, `false` for an outside cell.
    Inside(bool),
    /// Boundary fragments of an internal node's cut.
    Boundary(BoundaryAttribute<H>),
}

impl<H: Hyperplane> Attribute<H> {
    /// The leaf flag, if this attribute is one.
    #[inline]
    pub fn flag(&self) -> Option<bool> {
        match self {
            Attribute::Inside(inside) => Some(*inside),
            _ => None,
        }
    }

    /// The boundary attribute, if this attribute is one.
    #[inline]
    pub fn boundary(&self) -> Option<&BoundaryAttribute<H>> {
        match self {
            Attribute::Boundary(boundary) => Some(boundary),
            _ => None,
        }
    }

    /// Checks if two leaf attributes carry the same value.
    ///
    /// Boundary attributes never compare equal.
    pub fn same_leaf_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Attribute::Absent, Attribute::Absent) => true,
            (Attribute::Inside(a), Attribute::Inside(b)) => a == b,
            _ => false,
        }
    }
}

/// Set of nodes, in insertion order and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodesSet {
    nodes: Vec<NodeId>,
}

impl NodesSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node if it is not already present.
    pub fn add(&mut self, node: NodeId) {
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    /// Adds all nodes from an iterator.
    pub fn add_all<I: IntoIterator<Item = NodeId>>(&mut self, nodes: I) {
        for node in nodes {
            self.add(node);
        }
    }

    /// Checks membership.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    /// Number of nodes in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Checks if the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

impl FromIterator<NodeId> for NodesSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut set = NodesSet::new();
        set.add_all(iter);
        set
    }
}

/// Boundary information attached to an internal node.
///
/// The cut of an internal node may be only partly on the region boundary.
/// This records the parts that are, split by orientation:
///
/// - `plus_outside`: boundary part with the outside on the plus side of the cut
/// - `plus_inside`: boundary part with the inside on the plus side of the cut
///
/// The splitters are the nodes whose cuts carved these parts out of the cut.
#[derive(Debug, Clone)]
pub struct BoundaryAttribute<H: Hyperplane> {
    plus_outside: Option<H::Sub>,
    plus_inside: Option<H::Sub>,
    splitters: NodesSet,
}

impl<H: Hyperplane> BoundaryAttribute<H> {
    /// Creates a boundary attribute.
    pub fn new(plus_outside: Option<H::Sub>, plus_inside: Option<H::Sub>, splitters: NodesSet) -> Self {
        Self {
            plus_outside,
            plus_inside,
            splitters,
        }
    }

    /// Part of the cut with the outside on its plus side.
    #[inline]
    pub fn plus_outside(&self) -> Option<&H::Sub> {
        self.plus_outside.as_ref()
    }

    /// Part of the cut with the inside on its plus side.
    #[inline]
    pub fn plus_inside(&self) -> Option<&H::Sub> {
        self.plus_inside.as_ref()
    }

    /// Nodes whose cuts carved the boundary parts.
    #[inline]
    pub fn splitters(&self) -> &NodesSet {
        &self.splitters
    }

    pub(crate) fn splitters_mut(&mut self) -> &mut NodesSet {
        &mut self.splitters
    }

    /// Iterates over the present boundary parts with their reversed flag.
    ///
    /// A part is reversed when the inside lies on the plus side of the cut.
    pub fn parts(&self) -> impl Iterator<Item = (&H::Sub, bool)> {
        self.plus_outside
            .iter()
            .map(|s| (s, false))
            .chain(self.plus_inside.iter().map(|s| (s, true)))
    }
}

/// Cut stored at an internal node.
#[derive(Debug, Clone)]
pub(crate) struct Cut<S> {
    pub(crate) sub: S,
    pub(crate) plus: NodeId,
    pub(crate) minus: NodeId,
}

/// A node of the arena.
///
/// A node with a cut is internal, a node without one is a leaf.
#[derive(Debug, Clone)]
pub(crate) struct Node<H: Hyperplane> {
    pub(crate) cut: Option<Cut<H::Sub>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) attribute: Attribute<H>,
}

impl<H: Hyperplane> Node<H> {
    pub(crate) fn leaf(attribute: Attribute<H>) -> Self {
        Self {
            cut: None,
            parent: None,
            attribute,
        }
    }
}
