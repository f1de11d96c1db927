//! Boundary characterization.
//!
//! The cut of an internal node is generally larger than the part of it that
//! separates inside from outside. [`BoundaryBuilder`] finds that part by
//! pushing the cut down both subtrees with [`Characterization`] and records
//! it as a [`BoundaryAttribute`] on the node.

use super::hyperplane::{Hyperplane, SubHyperplane};
use super::node::{Attribute, BoundaryAttribute, NodeId, NodesSet};
use super::tree::BspTree;
use super::visitor::{BspTreeVisitor, Order};

/// Fragments of a sub-hyperplane sorted by the kind of leaf they reach in a
/// subtree.
///
/// Each fragment pushed down the subtree is split at every cut it crosses.
/// The pieces landing on inside leaves are reunited into the inside-touching
/// part, those landing on outside leaves into the outside-touching part.
/// The nodes that had to split a piece are remembered as splitters of the
/// corresponding part.
#[derive(Debug, Clone)]
pub struct Characterization<H: Hyperplane> {
    outside_touching: Option<H::Sub>,
    inside_touching: Option<H::Sub>,
    outside_splitters: NodesSet,
    inside_splitters: NodesSet,
}

impl<H: Hyperplane> Characterization<H> {
    /// Characterizes `sub` against the subtree rooted at `node`.
    ///
    /// A fragment found lying on a descendant cut is logged with
    /// `log::warn!` and left out of both touching parts.
    ///
    /// # Panics
    ///
    /// Panics if a reached leaf carries no inside/outside flag.
    pub fn new(tree: &BspTree<H>, node: NodeId, sub: H::Sub) -> Self {
        let mut characterization = Self {
            outside_touching: None,
            inside_touching: None,
            outside_splitters: NodesSet::new(),
            inside_splitters: NodesSet::new(),
        };
        let mut splitters = Vec::new();
        characterization.characterize(tree, node, sub, &mut splitters);
        characterization
    }

    fn characterize(&mut self, tree: &BspTree<H>, node: NodeId, sub: H::Sub, splitters: &mut Vec<NodeId>) {
        let Some((plus, minus)) = tree.children(node) else {
            let inside = tree
                .attribute(node)
                .flag()
                .unwrap_or_else(|| panic!("leaf {node} carries no inside/outside flag"));
            if inside {
                self.add_inside_touching(sub, splitters);
            } else {
                self.add_outside_touching(sub, splitters);
            }
            return;
        };

        let Some(hyperplane) = tree.hyperplane(node) else {
            return;
        };
        match sub.split(hyperplane).into_parts() {
            (Some(sub_plus), Some(sub_minus)) => {
                splitters.push(node);
                self.characterize(tree, plus, sub_plus, splitters);
                self.characterize(tree, minus, sub_minus, splitters);
                splitters.pop();
            }
            (Some(_), None) => self.characterize(tree, plus, sub, splitters),
            (None, Some(_)) => self.characterize(tree, minus, sub, splitters),
            (None, None) => {
                // a fragment lying on a descendant cut is inconsistent geometry:
                // reported and skipped
                log::warn!("fragment lies on the cut of node {node}, dropped from characterization");
            }
        }
    }

    fn add_outside_touching(&mut self, sub: H::Sub, splitters: &[NodeId]) {
        self.outside_touching = Some(match self.outside_touching.take() {
            None => sub,
            Some(touching) => touching.reunite(&sub),
        });
        self.outside_splitters.add_all(splitters.iter().copied());
    }

    fn add_inside_touching(&mut self, sub: H::Sub, splitters: &[NodeId]) {
        self.inside_touching = Some(match self.inside_touching.take() {
            None => sub,
            Some(touching) => touching.reunite(&sub),
        });
        self.inside_splitters.add_all(splitters.iter().copied());
    }

    /// Checks if some part of the fragment reaches an outside leaf.
    pub fn touch_outside(&self) -> bool {
        self.outside_touching.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Part of the fragment reaching outside leaves.
    pub fn outside_touching(&self) -> Option<&H::Sub> {
        self.outside_touching.as_ref()
    }

    /// Nodes that split the outside-touching part.
    pub fn outside_splitters(&self) -> &NodesSet {
        &self.outside_splitters
    }

    /// Checks if some part of the fragment reaches an inside leaf.
    pub fn touch_inside(&self) -> bool {
        self.inside_touching.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// Part of the fragment reaching inside leaves.
    pub fn inside_touching(&self) -> Option<&H::Sub> {
        self.inside_touching.as_ref()
    }

    /// Nodes that split the inside-touching part.
    pub fn inside_splitters(&self) -> &NodesSet {
        &self.inside_splitters
    }
}

/// Visitor computing the boundary attribute of every internal node.
///
/// The visitor only reads the tree; the computed attributes are applied
/// afterwards by [`build_boundary`].
#[derive(Debug)]
pub struct BoundaryBuilder<H: Hyperplane> {
    attributes: Vec<(NodeId, BoundaryAttribute<H>)>,
}

impl<H: Hyperplane> BoundaryBuilder<H> {
    pub fn new() -> Self {
        Self { attributes: Vec::new() }
    }

    /// Computed attributes, in visit order.
    pub fn into_attributes(self) -> Vec<(NodeId, BoundaryAttribute<H>)> {
        self.attributes
    }
}

impl<H: Hyperplane> Default for BoundaryBuilder<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Hyperplane> BspTreeVisitor<H> for BoundaryBuilder<H> {
    fn visit_order(&mut self, _tree: &BspTree<H>, _node: NodeId) -> Order {
        Order::PlusSubMinus
    }

    fn visit_internal_node(&mut self, tree: &BspTree<H>, node: NodeId) {
        let (Some(cut), Some((plus, minus))) = (tree.cut(node), tree.children(node)) else {
            return;
        };

        let mut plus_outside = None;
        let mut plus_inside = None;
        let mut splitters: Option<NodesSet> = None;

        // characterize the cut sub-hyperplane, first with respect to the
        // plus subtree, then the relevant parts with respect to the minus one
        let plus_char = Characterization::new(tree, plus, cut.clone());

        if let Some(touching) = plus_char.outside_touching().filter(|_| plus_char.touch_outside()) {
            // outside on the plus side, boundary where the minus side is inside
            let minus_char = Characterization::new(tree, minus, touching.clone());
            if minus_char.touch_inside() {
                plus_outside = minus_char.inside_touching().cloned();
                let set = splitters.get_or_insert_with(NodesSet::new);
                set.add_all(minus_char.inside_splitters().iter());
                set.add_all(plus_char.outside_splitters().iter());
            }
        }

        if let Some(touching) = plus_char.inside_touching().filter(|_| plus_char.touch_inside()) {
            // inside on the plus side, boundary where the minus side is outside
            let minus_char = Characterization::new(tree, minus, touching.clone());
            if minus_char.touch_outside() {
                plus_inside = minus_char.outside_touching().cloned();
                let set = splitters.get_or_insert_with(NodesSet::new);
                set.add_all(minus_char.outside_splitters().iter());
                set.add_all(plus_char.inside_splitters().iter());
            }
        }

        if let Some(set) = splitters.as_mut() {
            // ancestors bound every fragment of the cut
            let mut up = tree.parent(node);
            while let Some(ancestor) = up {
                set.add(ancestor);
                up = tree.parent(ancestor);
            }
        }

        self.attributes.push((
            node,
            BoundaryAttribute::new(plus_outside, plus_inside, splitters.unwrap_or_default()),
        ));
    }

    fn visit_leaf_node(&mut self, _tree: &BspTree<H>, _node: NodeId) {}
}

/// Stores a boundary attribute on every internal node of a tree.
///
/// # Panics
///
/// Panics if a leaf carries no inside/outside flag.
pub fn build_boundary<H: Hyperplane>(tree: &mut BspTree<H>) {
    let mut builder = BoundaryBuilder::new();
    tree.visit(&mut builder);
    for (node, attribute) in builder.into_attributes() {
        tree.set_attribute(node, Attribute::Boundary(attribute));
    }
}

/// Visitor summing the sizes of all boundary fragments.
///
/// Internal nodes without a boundary attribute contribute nothing.
#[derive(Debug, Default, Clone)]
pub struct BoundarySizeVisitor {
    size: f64,
}

impl BoundarySizeVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated boundary size.
    pub fn size(&self) -> f64 {
        self.size
    }
}

impl<H: Hyperplane> BspTreeVisitor<H> for BoundarySizeVisitor {
    fn visit_order(&mut self, _tree: &BspTree<H>, _node: NodeId) -> Order {
        Order::MinusSubPlus
    }

    fn visit_internal_node(&mut self, tree: &BspTree<H>, node: NodeId) {
        if let Some(boundary) = tree.attribute(node).boundary() {
            self.size += boundary.parts().map(|(part, _)| part.size()).sum::<f64>();
        }
    }

    fn visit_leaf_node(&mut self, _tree: &BspTree<H>, _node: NodeId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::NodeCollector;
    use crate::euclidean::{Line, interval, polygon};
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    const TOL: f64 = 1.0e-10;

    fn make_square() -> BspTree<Line> {
        let region = polygon(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            TOL,
        );
        region.into_tree()
    }

    #[test]
    fn every_internal_node_gets_an_attribute() {
        let mut tree = make_square();
        build_boundary(&mut tree);

        let mut collector = NodeCollector::new(Order::PlusMinusSub);
        tree.visit(&mut collector);
        assert_eq!(collector.internal_nodes().len(), 4);
        for &node in collector.internal_nodes() {
            assert!(tree.attribute(node).boundary().is_some());
        }
    }

    #[test]
    fn square_boundary_orientation() {
        let mut tree = make_square();
        build_boundary(&mut tree);

        // the square was built from its boundary: every cut has the inside
        // on its minus side, so only plus-outside parts exist
        let mut collector = NodeCollector::new(Order::PlusMinusSub);
        tree.visit(&mut collector);
        for &node in collector.internal_nodes() {
            let boundary = tree.attribute(node).boundary().unwrap();
            assert!(boundary.plus_inside().is_none());
            let part = boundary.plus_outside().unwrap();
            assert_relative_eq!(part.size(), 1.0, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn splitters_include_ancestors() {
        let mut tree = make_square();
        build_boundary(&mut tree);

        let mut collector = NodeCollector::new(Order::PlusMinusSub);
        tree.visit(&mut collector);
        for &node in collector.internal_nodes() {
            let boundary = tree.attribute(node).boundary().unwrap();
            let mut up = tree.parent(node);
            while let Some(ancestor) = up {
                assert!(boundary.splitters().contains(ancestor));
                up = tree.parent(ancestor);
            }
        }
    }

    #[test]
    fn boundary_size_of_square_and_interval() {
        let mut tree = make_square();
        build_boundary(&mut tree);
        let mut visitor = BoundarySizeVisitor::new();
        tree.visit(&mut visitor);
        assert_relative_eq!(visitor.size(), 4.0, epsilon = 1.0e-12);

        // two end points, each counted once
        let mut tree = interval(0.0, 3.0, TOL).into_tree();
        build_boundary(&mut tree);
        let mut visitor = BoundarySizeVisitor::new();
        tree.visit(&mut visitor);
        assert_relative_eq!(visitor.size(), 2.0);
    }

    #[test]
    fn characterization_sorts_fragments() {
        let tree = make_square();
        // the line y = 0.5 crosses the square: its middle part touches the
        // inside, both ends touch the outside
        let line = Line::from_points(Point2::new(-5.0, 0.5), Point2::new(5.0, 0.5), TOL);
        let characterization = Characterization::new(&tree, tree.root(), line.whole_hyperplane());

        assert!(characterization.touch_inside());
        assert!(characterization.touch_outside());
        assert_relative_eq!(characterization.inside_touching().unwrap().size(), 1.0, epsilon = 1.0e-12);
        assert!(characterization.outside_touching().unwrap().size().is_infinite());
        assert!(!characterization.inside_splitters().is_empty());
    }
}
