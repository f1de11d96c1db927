//! Arena-backed BSP tree and its structural operations.

use std::collections::HashMap;

use crate::error::RegionError;

use super::hyperplane::{Hyperplane, Point, SubHyperplane};
use super::interior::InsideCellFinder;
use super::node::{Attribute, BoundaryAttribute, Cut, Node, NodeId};
use super::visitor::{BspTreeVisitor, Order};

/// A Binary Space Partitioning tree.
///
/// Every node is either a leaf carrying an [`Attribute`], or an internal node
/// carrying a cut sub-hyperplane, a plus child (positive side of the cut) and
/// a minus child (negative side). Nodes live in an arena and are addressed by
/// [`NodeId`]; the parent link of a node is a plain handle, so the tree has
/// no ownership cycles.
///
/// The cut of an internal node is always restricted to the convex cell of
/// that node, i.e. the intersection of the half-spaces chosen by all its
/// ancestors.
///
/// # Construction
///
/// ```ignore
/// use bsp_region::bsp::{Attribute, BspTree};
///
/// let mut tree = BspTree::new(Attribute::Inside(true));
/// let root = tree.root();
/// if tree.insert_cut(root, &hyperplane) {
///     tree.set_attribute(tree.plus(root).unwrap(), Attribute::Inside(false));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BspTree<H: Hyperplane> {
    nodes: Vec<Node<H>>,
    root: NodeId,
}

/// Strategy deciding how a leaf and a subtree combine during [`BspTree::merge`].
///
/// Implementations graft either the leaf or (a transformed copy of) the
/// other subtree at the given position using
/// [`BspTree::insert_in_tree`], and return the grafted node.
pub trait LeafMerger<H: Hyperplane> {
    /// Merges a leaf with a subtree of the other tree.
    ///
    /// `leaf_from_instance` is `true` when `leaf` belongs to the tree `merge`
    /// was called on, `false` when it belongs to the argument tree.
    fn merge(
        &mut self,
        tree: &mut BspTree<H>,
        leaf: NodeId,
        other: NodeId,
        parent: Option<NodeId>,
        is_plus_child: bool,
        leaf_from_instance: bool,
    ) -> NodeId;
}

/// Decides what a node becomes when its cut vanishes while it is fitted
/// into a smaller cell.
pub trait VanishingCutHandler<H: Hyperplane> {
    /// Attribute of the leaf replacing `node`.
    ///
    /// The node still carries its former cut and children when this is
    /// called.
    fn fix_node(&self, tree: &BspTree<H>, node: NodeId) -> Attribute<H>;
}

/// A point inside a cell together with its distance to the closest wall.
#[derive(Debug, Clone, PartialEq)]
pub struct InteriorPoint<P> {
    point: P,
    distance: f64,
}

impl<P> InteriorPoint<P> {
    pub(crate) fn new(point: P, distance: f64) -> Self {
        Self { point, distance }
    }

    /// The interior point.
    #[inline]
    pub fn point(&self) -> &P {
        &self.point
    }

    /// Distance from the point to the closest wall of the cell.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Consumes self, returning the point.
    pub fn into_point(self) -> P {
        self.point
    }
}

/// Rewrites nodes while a subtree is rebuilt.
///
/// Splitter sets are not handled by the mapper: they are remapped once the
/// whole subtree exists.
pub(crate) trait NodeMapper<H: Hyperplane> {
    fn map_cut(&mut self, sub: &H::Sub) -> H::Sub;

    fn map_leaf(&mut self, attribute: &Attribute<H>) -> Attribute<H>;

    /// Must return an attribute with an empty splitter set.
    fn map_boundary(&mut self, boundary: &BoundaryAttribute<H>) -> BoundaryAttribute<H>;
}

/// Plain copy.
pub(crate) struct Identity;

impl<H: Hyperplane> NodeMapper<H> for Identity {
    fn map_cut(&mut self, sub: &H::Sub) -> H::Sub {
        sub.clone()
    }

    fn map_leaf(&mut self, attribute: &Attribute<H>) -> Attribute<H> {
        attribute.clone()
    }

    fn map_boundary(&mut self, boundary: &BoundaryAttribute<H>) -> BoundaryAttribute<H> {
        BoundaryAttribute::new(
            boundary.plus_outside().cloned(),
            boundary.plus_inside().cloned(),
            Default::default(),
        )
    }
}

impl<H: Hyperplane> BspTree<H> {
    /// Creates a tree made of a single leaf.
    pub fn new(attribute: Attribute<H>) -> Self {
        Self {
            nodes: vec![Node::leaf(attribute)],
            root: NodeId(0),
        }
    }

    /// Creates a tree from a cut and two subtrees.
    ///
    /// The cut is used as is: it must already be restricted to the cell the
    /// new root will occupy.
    pub fn from_parts(cut: H::Sub, plus: BspTree<H>, minus: BspTree<H>, attribute: Attribute<H>) -> Self {
        let mut tree = Self::new(attribute);
        let root = tree.root;
        let plus = tree.absorb(plus);
        let minus = tree.absorb(minus);
        tree.set_cut(root, cut, plus, minus);
        tree
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes stored in the arena.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        &mut self.nodes[id.0]
    }

    /// Checks if a node is a leaf.
    #[inline]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.node(id).cut.is_none()
    }

    /// Cut sub-hyperplane of an internal node.
    #[inline]
    pub fn cut(&self, id: NodeId) -> Option<&H::Sub> {
        self.node(id).cut.as_ref().map(|c| &c.sub)
    }

    /// Hyperplane supporting the cut of an internal node.
    #[inline]
    pub fn hyperplane(&self, id: NodeId) -> Option<&H> {
        self.cut(id).map(|s| s.hyperplane())
    }

    /// Child on the plus side of an internal node.
    #[inline]
    pub fn plus(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).cut.as_ref().map(|c| c.plus)
    }

    /// Child on the minus side of an internal node.
    #[inline]
    pub fn minus(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).cut.as_ref().map(|c| c.minus)
    }

    /// `(plus, minus)` children of an internal node.
    #[inline]
    pub fn children(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        self.node(id).cut.as_ref().map(|c| (c.plus, c.minus))
    }

    /// Parent of a node, `None` for the root of a tree or a detached subtree.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Attribute of a node.
    #[inline]
    pub fn attribute(&self, id: NodeId) -> &Attribute<H> {
        &self.node(id).attribute
    }

    /// Replaces the attribute of a node.
    pub fn set_attribute(&mut self, id: NodeId, attribute: Attribute<H>) {
        self.node_mut(id).attribute = attribute;
    }

    /// Number of ancestors of a node (0 for the root).
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Walls of the cell of a node: every ancestor hyperplane, with `true`
    /// when the cell lies on its plus side. Nearest ancestor first.
    pub(crate) fn walls(&self, id: NodeId) -> Vec<(&H, bool)> {
        let mut walls = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if let Some(cut) = &self.node(parent).cut {
                walls.push((cut.sub.hyperplane(), cut.plus == current));
            }
            current = parent;
        }
        walls
    }

    fn new_leaf(&mut self, attribute: Attribute<H>) -> NodeId {
        self.nodes.push(Node::leaf(attribute));
        NodeId(self.nodes.len() - 1)
    }

    fn new_internal(&mut self, sub: H::Sub, plus: NodeId, minus: NodeId, attribute: Attribute<H>) -> NodeId {
        let id = self.new_leaf(attribute);
        self.set_cut(id, sub, plus, minus);
        id
    }

    fn set_cut(&mut self, id: NodeId, sub: H::Sub, plus: NodeId, minus: NodeId) {
        self.node_mut(plus).parent = Some(id);
        self.node_mut(minus).parent = Some(id);
        self.node_mut(id).cut = Some(Cut { sub, plus, minus });
    }

    fn set_cut_sub(&mut self, id: NodeId, sub: H::Sub) {
        if let Some(cut) = self.node_mut(id).cut.as_mut() {
            cut.sub = sub;
        }
    }

    fn make_leaf(&mut self, id: NodeId, attribute: Attribute<H>) {
        let node = self.node_mut(id);
        node.cut = None;
        node.attribute = attribute;
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, is_plus_child: bool) {
        self.node_mut(child).parent = Some(parent);
        if let Some(cut) = self.node_mut(parent).cut.as_mut() {
            if is_plus_child {
                cut.plus = child;
            } else {
                cut.minus = child;
            }
        }
    }

    /// Moves all nodes of another tree into this arena, returning the
    /// handle of its root (detached).
    fn absorb(&mut self, other: BspTree<H>) -> NodeId {
        let offset = self.nodes.len();
        let shift = |id: NodeId| NodeId(id.0 + offset);
        for mut node in other.nodes {
            if let Some(cut) = node.cut.as_mut() {
                cut.plus = shift(cut.plus);
                cut.minus = shift(cut.minus);
            }
            node.parent = node.parent.map(shift);
            if let Attribute::Boundary(boundary) = &mut node.attribute {
                let shifted = boundary.splitters().iter().map(shift).collect();
                *boundary.splitters_mut() = shifted;
            }
            self.nodes.push(node);
        }
        shift(other.root)
    }

    /// Inserts a cut at a leaf.
    ///
    /// The hyperplane is restricted to the cell of the node by intersecting
    /// it with every ancestor cut, nearest ancestor first. If nothing
    /// remains the node is left untouched and `false` is returned, which is
    /// the normal way to detect a hyperplane that does not cross the cell.
    ///
    /// On success the node gets two fresh leaf children with
    /// [`Attribute::Absent`]; its own attribute is kept.
    pub fn insert_cut(&mut self, id: NodeId, hyperplane: &H) -> bool {
        let Some(chopped) = self.fit_to_cell(id, hyperplane.whole_hyperplane()) else {
            return false;
        };
        let plus = self.new_leaf(Attribute::Absent);
        let minus = self.new_leaf(Attribute::Absent);
        self.set_cut(id, chopped, plus, minus);
        true
    }

    /// Restricts a fragment to the cell of a node.
    pub(crate) fn fit_to_cell(&self, id: NodeId, sub: H::Sub) -> Option<H::Sub> {
        let mut fitted = sub;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let cut = self.node(parent).cut.as_ref()?;
            let (plus, minus) = fitted.split(cut.sub.hyperplane()).into_parts();
            fitted = if cut.plus == current { plus? } else { minus? };
            current = parent;
        }
        Some(fitted)
    }

    /// Facets of the cell of a node: each wall hyperplane restricted by all
    /// the other walls. Walls that do not touch the cell are skipped.
    pub fn cell_facets(&self, id: NodeId) -> Vec<H::Sub> {
        let walls = self.walls(id);
        walls
            .iter()
            .enumerate()
            .filter_map(|(i, (hyperplane, _))| {
                let mut facet = hyperplane.whole_hyperplane();
                for (j, (other, on_plus)) in walls.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let (plus, minus) = facet.split(other).into_parts();
                    facet = if *on_plus { plus? } else { minus? };
                }
                Some(facet)
            })
            .collect()
    }

    /// Finds the cell containing a point, starting from `id`.
    ///
    /// Descends according to the point offset at each cut. If the point is
    /// within `tolerance` of a cut, that internal node is returned and the
    /// caller resolves which side it belongs to.
    pub fn cell(&self, id: NodeId, point: &H::Point, tolerance: f64) -> NodeId {
        let mut current = id;
        while let Some(cut) = &self.node(current).cut {
            let offset = cut.sub.hyperplane().offset(point);
            if offset.abs() <= tolerance {
                return current;
            }
            current = if offset <= 0.0 { cut.minus } else { cut.plus };
        }
        current
    }

    /// Internal nodes whose cut hyperplane is within `max_offset` of a point.
    ///
    /// Only the sides of each cut the point can reach are explored.
    pub fn close_cuts(&self, id: NodeId, point: &H::Point, max_offset: f64) -> Vec<NodeId> {
        let mut close = Vec::new();
        self.collect_close_cuts(id, point, max_offset, &mut close);
        close
    }

    fn collect_close_cuts(&self, id: NodeId, point: &H::Point, max_offset: f64, close: &mut Vec<NodeId>) {
        if let Some(cut) = &self.node(id).cut {
            let offset = cut.sub.hyperplane().offset(point);
            if offset < -max_offset {
                self.collect_close_cuts(cut.minus, point, max_offset, close);
            } else if offset > max_offset {
                self.collect_close_cuts(cut.plus, point, max_offset, close);
            } else {
                close.push(id);
                self.collect_close_cuts(cut.plus, point, max_offset, close);
                self.collect_close_cuts(cut.minus, point, max_offset, close);
            }
        }
    }

    /// Visits the whole tree.
    pub fn visit<V: BspTreeVisitor<H> + ?Sized>(&self, visitor: &mut V) {
        self.visit_from(self.root, visitor);
    }

    /// Visits the subtree rooted at a node.
    pub fn visit_from<V: BspTreeVisitor<H> + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        let Some((plus, minus)) = self.children(id) else {
            visitor.visit_leaf_node(self, id);
            return;
        };
        match visitor.visit_order(self, id) {
            Order::PlusMinusSub => {
                self.visit_from(plus, visitor);
                self.visit_from(minus, visitor);
                visitor.visit_internal_node(self, id);
            }
            Order::PlusSubMinus => {
                self.visit_from(plus, visitor);
                visitor.visit_internal_node(self, id);
                self.visit_from(minus, visitor);
            }
            Order::MinusPlusSub => {
                self.visit_from(minus, visitor);
                self.visit_from(plus, visitor);
                visitor.visit_internal_node(self, id);
            }
            Order::MinusSubPlus => {
                self.visit_from(minus, visitor);
                visitor.visit_internal_node(self, id);
                self.visit_from(plus, visitor);
            }
            Order::SubPlusMinus => {
                visitor.visit_internal_node(self, id);
                self.visit_from(plus, visitor);
                self.visit_from(minus, visitor);
            }
            Order::SubMinusPlus => {
                visitor.visit_internal_node(self, id);
                self.visit_from(minus, visitor);
                self.visit_from(plus, visitor);
            }
        }
    }

    /// Copies the subtree rooted at a node into a standalone tree.
    ///
    /// Splitters referring to nodes outside the subtree are dropped.
    pub fn copy_subtree(&self, id: NodeId) -> BspTree<H> {
        self.rebuild(id, &mut Identity)
    }

    /// Rebuilds a subtree into a new arena.
    pub(crate) fn rebuild<M: NodeMapper<H>>(&self, id: NodeId, mapper: &mut M) -> BspTree<H> {
        let mut nodes = Vec::new();
        let mut map = HashMap::new();
        let root = self.rebuild_into(id, mapper, 0, &mut nodes, &mut map);
        self.remap_splitters(&map, &mut nodes, 0, false);
        BspTree { nodes, root }
    }

    /// Rebuilds a subtree at the end of this arena, returning the new
    /// (detached) subtree root.
    pub(crate) fn rebuild_appended<M: NodeMapper<H>>(&mut self, id: NodeId, mapper: &mut M) -> NodeId {
        let base = self.nodes.len();
        let mut nodes = Vec::new();
        let mut map = HashMap::new();
        let root = self.rebuild_into(id, mapper, base, &mut nodes, &mut map);
        self.remap_splitters(&map, &mut nodes, base, true);
        self.nodes.extend(nodes);
        root
    }

    fn rebuild_into<M: NodeMapper<H>>(
        &self,
        id: NodeId,
        mapper: &mut M,
        base: usize,
        out: &mut Vec<Node<H>>,
        map: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        let node = self.node(id);
        let new_id = NodeId(base + out.len());
        match &node.cut {
            None => out.push(Node::leaf(mapper.map_leaf(&node.attribute))),
            Some(cut) => {
                let attribute = match &node.attribute {
                    Attribute::Boundary(boundary) => Attribute::Boundary(mapper.map_boundary(boundary)),
                    other => other.clone(),
                };
                out.push(Node::leaf(attribute));
                let plus = self.rebuild_into(cut.plus, mapper, base, out, map);
                let minus = self.rebuild_into(cut.minus, mapper, base, out, map);
                out[plus.0 - base].parent = Some(new_id);
                out[minus.0 - base].parent = Some(new_id);
                out[new_id.0 - base].cut = Some(Cut {
                    sub: mapper.map_cut(&cut.sub),
                    plus,
                    minus,
                });
            }
        }
        map.insert(id, new_id);
        new_id
    }

    /// Second pass of a rebuild: re-attach splitter sets through the
    /// old-to-new node map.
    fn remap_splitters(
        &self,
        map: &HashMap<NodeId, NodeId>,
        out: &mut [Node<H>],
        base: usize,
        keep_unmapped: bool,
    ) {
        for (old, new) in map {
            let Some(original) = self.node(*old).attribute.boundary() else {
                continue;
            };
            if let Attribute::Boundary(rebuilt) = &mut out[new.0 - base].attribute {
                for splitter in original.splitters().iter() {
                    match map.get(&splitter) {
                        Some(mapped) => rebuilt.splitters_mut().add(*mapped),
                        None if keep_unmapped => rebuilt.splitters_mut().add(splitter),
                        None => {}
                    }
                }
            }
        }
    }

    /// Collapses an internal node whose two children are leaves carrying the
    /// same attribute.
    pub(crate) fn condense(&mut self, id: NodeId) {
        let Some((plus, minus)) = self.children(id) else {
            return;
        };
        if self.is_leaf(plus)
            && self.is_leaf(minus)
            && self.attribute(plus).same_leaf_value(self.attribute(minus))
        {
            let attribute = self.attribute(plus).clone();
            self.make_leaf(id, attribute);
        }
    }

    /// Splits the subtree rooted at a node by a sub-hyperplane.
    ///
    /// Returns the root of a new subtree whose cut is `sub`, whose plus
    /// child holds the part of the original subtree on the plus side of
    /// `sub` and whose minus child holds the part on the minus side. The
    /// original subtree is consumed: its nodes are reused or discarded.
    pub fn split(&mut self, id: NodeId, sub: H::Sub) -> NodeId {
        self.split_node(id, sub).0
    }

    /// Same as [`split`](Self::split), also returning the `(plus, minus)`
    /// children of the new root.
    fn split_node(&mut self, id: NodeId, sub: H::Sub) -> (NodeId, NodeId, NodeId) {
        let Some(cut) = self.node(id).cut.clone() else {
            let minus = self.new_leaf(self.attribute(id).clone());
            let root = self.new_internal(sub, id, minus, Attribute::Absent);
            return (root, id, minus);
        };

        let attribute = self.attribute(id).clone();
        let cut_hyperplane = cut.sub.hyperplane().clone();
        let sub_hyperplane = sub.hyperplane().clone();

        match sub.split(&cut_hyperplane).into_parts() {
            (Some(sub_plus), Some(sub_minus)) => {
                // the sub-hyperplane crosses the cut: both subtrees are split
                let (cut_plus, cut_minus) = cut.sub.split(&sub_hyperplane).into_parts();
                let (p_root, p_plus, p_minus) = self.split_node(cut.plus, sub_plus);
                let (m_root, m_plus, m_minus) = self.split_node(cut.minus, sub_minus);
                let root = self.new_internal(sub, p_root, m_root, Attribute::Absent);
                if cut_plus.is_none() || cut_minus.is_none() {
                    log::warn!("cut does not cross a sub-hyperplane that crosses it, keeping it whole");
                }
                self.set_cut(p_root, cut_plus.unwrap_or_else(|| cut.sub.clone()), p_plus, m_plus);
                self.set_cut(m_root, cut_minus.unwrap_or_else(|| cut.sub.clone()), p_minus, m_minus);
                self.condense(p_root);
                self.condense(m_root);
                (root, p_root, m_root)
            }
            (Some(_), None) => {
                // the sub-hyperplane lies entirely in the plus subtree
                let (root, plus, minus) = self.split_node(cut.plus, sub);
                if cut.sub.split(&sub_hyperplane).side() == super::Side::Plus {
                    let node = self.new_internal(cut.sub, plus, cut.minus, attribute);
                    self.condense(node);
                    self.attach(root, node, true);
                    (root, node, minus)
                } else {
                    let node = self.new_internal(cut.sub, minus, cut.minus, attribute);
                    self.condense(node);
                    self.attach(root, node, false);
                    (root, plus, node)
                }
            }
            (None, Some(_)) => {
                // the sub-hyperplane lies entirely in the minus subtree
                let (root, plus, minus) = self.split_node(cut.minus, sub);
                if cut.sub.split(&sub_hyperplane).side() == super::Side::Plus {
                    let node = self.new_internal(cut.sub, cut.plus, plus, attribute);
                    self.condense(node);
                    self.attach(root, node, true);
                    (root, node, minus)
                } else {
                    let node = self.new_internal(cut.sub, cut.plus, minus, attribute);
                    self.condense(node);
                    self.attach(root, node, false);
                    (root, plus, node)
                }
            }
            (None, None) => {
                // the sub-hyperplane and the cut share the same hyperplane
                let (plus, minus) = if cut_hyperplane.same_orientation_as(&sub_hyperplane) {
                    (cut.plus, cut.minus)
                } else {
                    (cut.minus, cut.plus)
                };
                let root = self.new_internal(sub, plus, minus, attribute);
                (root, plus, minus)
            }
        }
    }

    /// Merges this tree with another one.
    ///
    /// Both trees are walked in lock-step, following the structure of this
    /// tree. Wherever one side reaches a leaf, the [`LeafMerger`] decides
    /// what the result is. Both input trees are consumed.
    pub fn merge<M: LeafMerger<H> + ?Sized>(mut self, other: BspTree<H>, merger: &mut M) -> BspTree<H> {
        let other_root = self.absorb(other);
        let root = self.merge_nodes(self.root, other_root, merger, None, false);
        self.node_mut(root).parent = None;
        self.root = root;
        self.rebuild(root, &mut Identity)
    }

    /// Merges the subtree at `id` with the subtree at `other`.
    ///
    /// After both sides are merged, the resulting cut is restricted again to
    /// its cell. If the restriction comes out empty, the previous cut
    /// fragment is kept and the node stays internal.
    fn merge_nodes<M: LeafMerger<H> + ?Sized>(
        &mut self,
        id: NodeId,
        other: NodeId,
        merger: &mut M,
        parent: Option<NodeId>,
        is_plus_child: bool,
    ) -> NodeId {
        let Some(cut) = self.node(id).cut.clone() else {
            // cell/tree operation
            return merger.merge(self, id, other, parent, is_plus_child, true);
        };
        if self.is_leaf(other) {
            // tree/cell operation
            return merger.merge(self, other, id, parent, is_plus_child, false);
        }

        // tree/tree operation
        let (merged, merged_plus, merged_minus) = self.split_node(other, cut.sub);
        if let Some(parent) = parent {
            self.attach(parent, merged, is_plus_child);
        }

        self.merge_nodes(cut.plus, merged_plus, merger, Some(merged), true);
        self.merge_nodes(cut.minus, merged_minus, merger, Some(merged), false);

        self.condense(merged);
        // a cut that no longer fits its cell keeps its previous fragment
        // rather than being cleared
        if let Some(hyperplane) = self.hyperplane(merged).cloned() {
            if let Some(fitted) = self.fit_to_cell(merged, hyperplane.whole_hyperplane()) {
                self.set_cut_sub(merged, fitted);
            }
        }

        merged
    }

    /// Grafts the subtree rooted at `id` under `parent`.
    ///
    /// The parent/child links are set up, then every cut of the grafted
    /// subtree is restricted to the cell it now occupies. Cuts that vanish
    /// in the process are resolved by `handler`. Without a parent, the
    /// subtree is only detached.
    pub fn insert_in_tree<V: VanishingCutHandler<H> + ?Sized>(
        &mut self,
        id: NodeId,
        parent: Option<NodeId>,
        is_plus_child: bool,
        handler: &V,
    ) {
        self.node_mut(id).parent = None;
        if let Some(parent) = parent {
            self.attach(parent, id, is_plus_child);
        }

        if self.is_leaf(id) {
            return;
        }

        let mut current = id;
        while let Some(up) = self.parent(current) {
            let Some(cut) = &self.node(up).cut else {
                break;
            };
            let on_plus = cut.plus == current;
            let hyperplane = cut.sub.hyperplane().clone();

            // chop off the parts of the grafted tree on the wrong side of
            // this ancestor hyperplane
            let kept = match &self.node(id).cut {
                Some(own) => {
                    let (plus, minus) = own.sub.split(&hyperplane).into_parts();
                    if on_plus { plus } else { minus }
                }
                None => break,
            };
            if let Some((plus, minus)) = self.children(id) {
                if on_plus {
                    self.chop_off_minus(plus, &hyperplane, handler);
                    self.chop_off_minus(minus, &hyperplane, handler);
                } else {
                    self.chop_off_plus(plus, &hyperplane, handler);
                    self.chop_off_plus(minus, &hyperplane, handler);
                }
            }

            match kept {
                Some(sub) => self.set_cut_sub(id, sub),
                None => {
                    let attribute = handler.fix_node(self, id);
                    log::debug!("cut of node {id} vanished, collapsed to a leaf");
                    self.make_leaf(id, attribute);
                    break;
                }
            }
            current = up;
        }

        self.condense(id);
    }

    fn chop_off_plus<V: VanishingCutHandler<H> + ?Sized>(&mut self, id: NodeId, hyperplane: &H, handler: &V) {
        self.chop_off(id, hyperplane, handler, false);
    }

    fn chop_off_minus<V: VanishingCutHandler<H> + ?Sized>(&mut self, id: NodeId, hyperplane: &H, handler: &V) {
        self.chop_off(id, hyperplane, handler, true);
    }

    /// Removes from the subtree everything on one side of a hyperplane,
    /// keeping the plus side if `keep_plus`.
    fn chop_off<V: VanishingCutHandler<H> + ?Sized>(
        &mut self,
        id: NodeId,
        hyperplane: &H,
        handler: &V,
        keep_plus: bool,
    ) {
        let Some(cut) = &self.node(id).cut else {
            return;
        };
        let (plus, minus) = (cut.plus, cut.minus);
        let (sub_plus, sub_minus) = cut.sub.split(hyperplane).into_parts();
        let kept = if keep_plus { sub_plus } else { sub_minus };

        self.chop_off(plus, hyperplane, handler, keep_plus);
        self.chop_off(minus, hyperplane, handler, keep_plus);

        match kept {
            Some(sub) => self.set_cut_sub(id, sub),
            None => {
                let attribute = handler.fix_node(self, id);
                self.make_leaf(id, attribute);
            }
        }
    }

    /// Extracts the convex cell containing a node as a standalone tree.
    ///
    /// The result is the chain of ancestor cuts of the node, with the node
    /// cell as a leaf carrying `cell_attribute`, every sibling collapsed to a
    /// leaf carrying `other_leaves_attribute` and internal nodes carrying
    /// `internal_attribute`.
    pub fn prune_around_convex_cell(
        &self,
        id: NodeId,
        cell_attribute: Attribute<H>,
        other_leaves_attribute: Attribute<H>,
        internal_attribute: Attribute<H>,
    ) -> BspTree<H> {
        let mut tree = BspTree::new(cell_attribute);
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let Some(cut) = &self.node(parent).cut else {
                break;
            };
            let sibling = BspTree::new(other_leaves_attribute.clone());
            tree = if cut.plus == current {
                BspTree::from_parts(cut.sub.clone(), tree, sibling, internal_attribute.clone())
            } else {
                BspTree::from_parts(cut.sub.clone(), sibling, tree, internal_attribute.clone())
            };
            current = parent;
        }
        tree
    }

    /// Finds a point strictly inside the convex cell of a node.
    ///
    /// The search starts from the barycenter of interior points of the
    /// cell facets (or `default_point` if the cell has none) and is made
    /// robust by [`InsideCellFinder`]. The root node cell is the whole
    /// space: `default_point` is returned with an infinite distance.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InsidePointNotFound`] if the cell is too thin
    /// for its hyperplanes' tolerance.
    pub fn interior_point(
        &self,
        id: NodeId,
        default_point: &H::Point,
    ) -> Result<InteriorPoint<H::Point>, RegionError> {
        if self.parent(id).is_none() {
            return Ok(InteriorPoint::new(default_point.clone(), f64::INFINITY));
        }

        let mut start: Option<H::Point> = None;
        let mut count = 0usize;
        for facet in self.cell_facets(id) {
            if let Some(p) = facet.interior_point() {
                count += 1;
                start = Some(match start {
                    None => p,
                    Some(s) => s.move_towards(&p, 1.0 / count as f64),
                });
            }
        }
        let start = start.unwrap_or_else(|| default_point.clone());

        let point = InsideCellFinder::new(self, id).find_inside_point(start)?;
        let distance = self
            .walls(id)
            .into_iter()
            .map(|(hyperplane, on_plus)| {
                let offset = hyperplane.offset(&point);
                if on_plus { offset } else { -offset }
            })
            .fold(f64::INFINITY, f64::min);

        Ok(InteriorPoint::new(point, distance))
    }
}
