//! Visitor pattern for BSP tree traversal.
//!
//! A single traversal primitive serves every analysis in the kernel: the
//! visitor picks, at each internal node, in which order the cut and the two
//! subtrees are handled.

use super::hyperplane::Hyperplane;
use super::node::NodeId;
use super::tree::BspTree;

/// Order in which an internal node and its subtrees are visited.
///
/// `Sub` stands for the internal node itself (its cut sub-hyperplane).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    PlusMinusSub,
    PlusSubMinus,
    MinusPlusSub,
    MinusSubPlus,
    SubPlusMinus,
    SubMinusPlus,
}

/// Visitor for BSP tree traversal.
///
/// Each node is handed to the visitor exactly once, either through
/// [`visit_internal_node`](Self::visit_internal_node) or through
/// [`visit_leaf_node`](Self::visit_leaf_node).
pub trait BspTreeVisitor<H: Hyperplane> {
    /// Chooses the visit order for an internal node.
    fn visit_order(&mut self, tree: &BspTree<H>, node: NodeId) -> Order;

    /// Called for each internal node.
    fn visit_internal_node(&mut self, tree: &BspTree<H>, node: NodeId);

    /// Called for each leaf node.
    fn visit_leaf_node(&mut self, tree: &BspTree<H>, node: NodeId);
}

/// A visitor that collects the visited nodes.
#[derive(Debug, Clone)]
pub struct NodeCollector {
    order: Order,
    internal: Vec<NodeId>,
    leaves: Vec<NodeId>,
}

impl NodeCollector {
    /// Creates a collector visiting every node with the same order.
    pub fn new(order: Order) -> Self {
        Self {
            order,
            internal: Vec::new(),
            leaves: Vec::new(),
        }
    }

    /// Internal nodes, in visit order.
    pub fn internal_nodes(&self) -> &[NodeId] {
        &self.internal
    }

    /// Leaf nodes, in visit order.
    pub fn leaf_nodes(&self) -> &[NodeId] {
        &self.leaves
    }

    /// Returns `(internal, leaves)`.
    pub fn into_nodes(self) -> (Vec<NodeId>, Vec<NodeId>) {
        (self.internal, self.leaves)
    }
}

impl<H: Hyperplane> BspTreeVisitor<H> for NodeCollector {
    fn visit_order(&mut self, _tree: &BspTree<H>, _node: NodeId) -> Order {
        self.order
    }

    fn visit_internal_node(&mut self, _tree: &BspTree<H>, node: NodeId) {
        self.internal.push(node);
    }

    fn visit_leaf_node(&mut self, _tree: &BspTree<H>, node: NodeId) {
        self.leaves.push(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::Attribute;
    use crate::euclidean::OrientedPoint;
    use nalgebra::Point1;

    /// Tree with cuts at 0 and 1 (both oriented towards +x).
    fn two_cut_tree() -> BspTree<OrientedPoint> {
        let mut tree = BspTree::new(Attribute::Absent);
        let root = tree.root();
        assert!(tree.insert_cut(root, &OrientedPoint::new(0.0, true, 1.0e-10)));
        let plus = tree.plus(root).unwrap();
        assert!(tree.insert_cut(plus, &OrientedPoint::new(1.0, true, 1.0e-10)));
        tree
    }

    #[test]
    fn collector_visits_every_node_once() {
        let tree = two_cut_tree();
        let mut visitor = NodeCollector::new(Order::PlusMinusSub);
        tree.visit(&mut visitor);

        assert_eq!(visitor.internal_nodes().len(), 2);
        assert_eq!(visitor.leaf_nodes().len(), 3);
    }

    #[test]
    fn order_controls_sequence() {
        let tree = two_cut_tree();
        let root = tree.root();
        let plus = tree.plus(root).unwrap();

        let mut sub_first = NodeCollector::new(Order::SubPlusMinus);
        tree.visit(&mut sub_first);
        assert_eq!(sub_first.internal_nodes(), &[root, plus]);

        let mut sub_last = NodeCollector::new(Order::PlusMinusSub);
        tree.visit(&mut sub_last);
        assert_eq!(sub_last.internal_nodes(), &[plus, root]);

        // leaves on the minus side come first with a minus-first order
        let mut minus_first = NodeCollector::new(Order::MinusSubPlus);
        tree.visit(&mut minus_first);
        let first_leaf = minus_first.leaf_nodes()[0];
        assert_eq!(first_leaf, tree.minus(root).unwrap());
        let p = Point1::new(-5.0);
        assert_eq!(tree.cell(root, &p, 1.0e-10), first_leaf);
    }
}
