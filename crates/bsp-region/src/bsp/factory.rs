//! Boolean operations on regions.
//!
//! All binary operations walk both trees in lock-step with
//! [`BspTree::merge`]. A [`LeafMerger`] per operation decides, each time one
//! side reaches a leaf, what ends up at that position in the result.

use crate::error::RegionError;

use super::hyperplane::Hyperplane;
use super::node::{Attribute, BoundaryAttribute, NodeId, NodesSet};
use super::region::{Location, Region};
use super::tree::{BspTree, LeafMerger, NodeMapper, VanishingCutHandler};
use super::visitor::{NodeCollector, Order};

/// Builder of regions from other regions.
///
/// Binary operations consume both operands: their trees are spliced into
/// the result. Clone an operand first to keep using it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegionFactory;

impl RegionFactory {
    /// Creates a factory.
    pub fn new() -> Self {
        Self
    }

    /// Builds the convex region on the minus side of all hyperplanes.
    ///
    /// The region uses the tolerance of the first hyperplane. See
    /// [`Region::from_hyperplanes`] for parallel hyperplanes.
    ///
    /// # Errors
    ///
    /// - [`RegionError::NoHyperplanes`] if the list is empty.
    /// - [`RegionError::NotConvex`] if a hyperplane lies entirely outside the
    ///   zone carved by the previous ones.
    pub fn build_convex<H: Hyperplane>(&self, hyperplanes: &[H]) -> Result<Region<H>, RegionError> {
        let first = hyperplanes.first().ok_or(RegionError::NoHyperplanes)?;
        Region::from_hyperplanes(hyperplanes, first.tolerance())
    }

    /// Union of two regions.
    pub fn union<H: Hyperplane>(&self, region1: Region<H>, region2: Region<H>) -> Region<H> {
        let mut merger = UnionMerger;
        Self::combine("union", region1, region2, &mut merger)
    }

    /// Intersection of two regions.
    pub fn intersection<H: Hyperplane>(&self, region1: Region<H>, region2: Region<H>) -> Region<H> {
        let mut merger = IntersectionMerger(FixingMerger::new(&region1, &region2));
        Self::combine("intersection", region1, region2, &mut merger)
    }

    /// Symmetric difference of two regions.
    pub fn xor<H: Hyperplane>(&self, region1: Region<H>, region2: Region<H>) -> Region<H> {
        let mut merger = XorMerger;
        Self::combine("xor", region1, region2, &mut merger)
    }

    /// Difference `region1 \ region2`.
    pub fn difference<H: Hyperplane>(&self, region1: Region<H>, region2: Region<H>) -> Region<H> {
        let mut merger = DifferenceMerger(FixingMerger::new(&region1, &region2));
        Self::combine("difference", region1, region2, &mut merger)
    }

    /// Complement of a region: inside and outside are exchanged.
    ///
    /// Cached boundary attributes are carried over with their two
    /// orientations exchanged.
    pub fn complement<H: Hyperplane>(&self, region: &Region<H>) -> Region<H> {
        let tree = region.clone().into_tree();
        region.build_new(tree.rebuild(tree.root(), &mut Complement))
    }

    fn combine<H, M>(operation: &str, region1: Region<H>, region2: Region<H>, merger: &mut M) -> Region<H>
    where
        H: Hyperplane,
        M: LeafMerger<H>,
    {
        let tolerance = region1.tolerance();
        let tree1 = region1.into_tree();
        let tree2 = region2.into_tree();
        log::debug!(
            "{operation}: merging trees with {} and {} nodes",
            tree1.node_count(),
            tree2.node_count()
        );

        let mut tree = tree1.merge(tree2, merger);
        clean_internal_nodes(&mut tree);

        log::debug!("{operation}: result has {} nodes", tree.node_count());
        Region::from_tree(tree, tolerance)
    }
}

/// Resets the attribute of every internal node, so that boundary
/// attributes get recomputed for the merged tree.
fn clean_internal_nodes<H: Hyperplane>(tree: &mut BspTree<H>) {
    let mut collector = NodeCollector::new(Order::PlusSubMinus);
    tree.visit(&mut collector);
    let (internal, _) = collector.into_nodes();
    for node in internal {
        tree.set_attribute(node, Attribute::Absent);
    }
}

fn leaf_is_inside<H: Hyperplane>(tree: &BspTree<H>, leaf: NodeId) -> bool {
    tree.attribute(leaf)
        .flag()
        .unwrap_or_else(|| panic!("leaf {leaf} carries no inside/outside flag"))
}

/// Exchanges inside and outside while rebuilding a subtree.
struct Complement;

impl<H: Hyperplane> NodeMapper<H> for Complement {
    fn map_cut(&mut self, sub: &H::Sub) -> H::Sub {
        sub.clone()
    }

    fn map_leaf(&mut self, attribute: &Attribute<H>) -> Attribute<H> {
        match attribute {
            Attribute::Inside(inside) => Attribute::Inside(!inside),
            other => other.clone(),
        }
    }

    fn map_boundary(&mut self, boundary: &BoundaryAttribute<H>) -> BoundaryAttribute<H> {
        BoundaryAttribute::new(
            boundary.plus_inside().cloned(),
            boundary.plus_outside().cloned(),
            NodesSet::new(),
        )
    }
}

/// Collapses vanishing cuts to a leaf, using a fixed flag when the two
/// children disagree.
struct VanishingToLeaf(bool);

impl<H: Hyperplane> VanishingCutHandler<H> for VanishingToLeaf {
    fn fix_node(&self, tree: &BspTree<H>, node: NodeId) -> Attribute<H> {
        if let Some((plus, minus)) = tree.children(node) {
            if tree.is_leaf(plus)
                && tree.is_leaf(minus)
                && tree.attribute(plus).same_leaf_value(tree.attribute(minus))
            {
                return tree.attribute(plus).clone();
            }
        }
        Attribute::Inside(self.0)
    }
}

struct UnionMerger;

impl<H: Hyperplane> LeafMerger<H> for UnionMerger {
    fn merge(
        &mut self,
        tree: &mut BspTree<H>,
        leaf: NodeId,
        other: NodeId,
        parent: Option<NodeId>,
        is_plus_child: bool,
        _leaf_from_instance: bool,
    ) -> NodeId {
        if leaf_is_inside(tree, leaf) {
            tree.insert_in_tree(leaf, parent, is_plus_child, &VanishingToLeaf(true));
            leaf
        } else {
            tree.insert_in_tree(other, parent, is_plus_child, &VanishingToLeaf(false));
            other
        }
    }
}

struct XorMerger;

impl<H: Hyperplane> LeafMerger<H> for XorMerger {
    fn merge(
        &mut self,
        tree: &mut BspTree<H>,
        leaf: NodeId,
        other: NodeId,
        parent: Option<NodeId>,
        is_plus_child: bool,
        _leaf_from_instance: bool,
    ) -> NodeId {
        let grafted = if leaf_is_inside(tree, leaf) {
            tree.rebuild_appended(other, &mut Complement)
        } else {
            other
        };
        tree.insert_in_tree(grafted, parent, is_plus_child, &VanishingToLeaf(true));
        grafted
    }
}

/// Resolves vanishing cuts by classifying a point of the degenerate cell
/// against both operands.
struct FixingMerger<H: Hyperplane> {
    region1: Region<H>,
    region2: Region<H>,
}

impl<H: Hyperplane> FixingMerger<H> {
    fn new(region1: &Region<H>, region2: &Region<H>) -> Self {
        Self {
            region1: region1.clone(),
            region2: region2.clone(),
        }
    }

    fn fix_with(&self, tree: &BspTree<H>, node: NodeId, should_be_inside: fn(Location, Location) -> bool) -> Attribute<H> {
        let Some(hyperplane) = tree.parent(node).and_then(|p| tree.hyperplane(p)) else {
            return Attribute::Inside(false);
        };
        let default_point = hyperplane.arbitrary_point();
        let point = match tree.interior_point(node, &default_point) {
            Ok(interior) => interior.into_point(),
            Err(e) => {
                log::debug!("degenerate cell {node}: {e}, using a point of its parent cut");
                default_point
            }
        };
        Attribute::Inside(should_be_inside(
            self.region1.check_point(&point),
            self.region2.check_point(&point),
        ))
    }
}

struct IntersectionMerger<H: Hyperplane>(FixingMerger<H>);

impl<H: Hyperplane> VanishingCutHandler<H> for IntersectionMerger<H> {
    fn fix_node(&self, tree: &BspTree<H>, node: NodeId) -> Attribute<H> {
        self.0.fix_with(tree, node, |l1, l2| l1 != Location::Outside && l2 != Location::Outside)
    }
}

impl<H: Hyperplane> LeafMerger<H> for IntersectionMerger<H> {
    fn merge(
        &mut self,
        tree: &mut BspTree<H>,
        leaf: NodeId,
        other: NodeId,
        parent: Option<NodeId>,
        is_plus_child: bool,
        _leaf_from_instance: bool,
    ) -> NodeId {
        let grafted = if leaf_is_inside(tree, leaf) { other } else { leaf };
        tree.insert_in_tree(grafted, parent, is_plus_child, &*self);
        grafted
    }
}

struct DifferenceMerger<H: Hyperplane>(FixingMerger<H>);

impl<H: Hyperplane> VanishingCutHandler<H> for DifferenceMerger<H> {
    fn fix_node(&self, tree: &BspTree<H>, node: NodeId) -> Attribute<H> {
        self.0.fix_with(tree, node, |l1, l2| l1 == Location::Inside && l2 == Location::Outside)
    }
}

impl<H: Hyperplane> LeafMerger<H> for DifferenceMerger<H> {
    fn merge(
        &mut self,
        tree: &mut BspTree<H>,
        leaf: NodeId,
        other: NodeId,
        parent: Option<NodeId>,
        is_plus_child: bool,
        leaf_from_instance: bool,
    ) -> NodeId {
        let grafted = if leaf_is_inside(tree, leaf) {
            // inside the first operand: keep what is outside the second one,
            // inside the second operand: nothing survives from the first one
            let arg = if leaf_from_instance { other } else { leaf };
            tree.rebuild_appended(arg, &mut Complement)
        } else if leaf_from_instance {
            leaf
        } else {
            other
        };
        tree.insert_in_tree(grafted, parent, is_plus_child, &*self);
        grafted
    }
}
