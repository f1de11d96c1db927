//! Interior point search.
//!
//! [`InsideCellFinder`] nudges a candidate point into a single convex cell,
//! [`InteriorPointFinder`] picks the most robust interior point of a whole
//! region.

use crate::error::RegionError;

use super::hyperplane::{Hyperplane, Point};
use super::node::NodeId;
use super::tree::{BspTree, InteriorPoint};
use super::visitor::{BspTreeVisitor, Order};

/// Maximum number of stages, each with a smaller move factor.
pub const MAX_STAGES: usize = 500;

/// Growth rate of the move factor, in units of tolerance.
pub const STAGE_FACTOR: f64 = 20.0;

/// Finds a point strictly inside a convex cell.
///
/// Starting from a candidate, the worst walls of the cell (largest offsets
/// towards the outside) are repeatedly corrected by moving the point
/// orthogonally to a small negative offset. When two walls are bad at the
/// same time the point moves to the middle of both corrections, so thin
/// wedges do not make it bounce between them.
///
/// Target offsets are `stage_factor * tolerance`, with a stage factor that
/// starts large and decreases quadratically down to 2 over [`MAX_STAGES`]
/// stages. Each stage allows as many moves as the cell has walls.
#[derive(Debug)]
pub struct InsideCellFinder<'a, H: Hyperplane> {
    tree: &'a BspTree<H>,
    cell: NodeId,
}

/// A wall of the cell seen from the current point.
struct Selection<'h, H> {
    hyperplane: &'h H,
    // +1 if the cell is on the minus side, -1 otherwise
    sign: f64,
    // negative inside the cell
    offset: f64,
}

impl<H: Hyperplane> Selection<'_, H> {
    fn point_is_inside(&self) -> bool {
        self.offset < -self.hyperplane.tolerance()
    }

    fn move_point(&self, point: &H::Point, stage_factor: f64) -> H::Point {
        let tolerance = self.sign * self.hyperplane.tolerance();
        self.hyperplane.move_to_offset(point, -stage_factor * tolerance)
    }
}

impl<'a, H: Hyperplane> InsideCellFinder<'a, H> {
    /// Creates a finder for the cell of a node.
    pub fn new(tree: &'a BspTree<H>, cell: NodeId) -> Self {
        Self { tree, cell }
    }

    /// Moves `start` until it lies inside the cell by more than the
    /// tolerance of every wall.
    ///
    /// The root cell has no walls: `start` is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InsidePointNotFound`] when all stages are
    /// exhausted, meaning the cell is too small for the tolerance.
    pub fn find_inside_point(&self, start: H::Point) -> Result<H::Point, RegionError> {
        let walls = self.tree.walls(self.cell);
        if walls.is_empty() {
            return Ok(start);
        }

        let mut point = start;
        for stage in 0..MAX_STAGES {
            // the last stage factor is 2
            let k = (MAX_STAGES - 1 - stage) as f64;
            let stage_factor = 2.0 + STAGE_FACTOR * k * k;

            for _ in 0..walls.len() {
                let mut max: Option<Selection<'_, H>> = None;
                let mut next: Option<Selection<'_, H>> = None;
                for &(hyperplane, on_plus) in &walls {
                    let sign = if on_plus { -1.0 } else { 1.0 };
                    let current = Selection {
                        hyperplane,
                        sign,
                        offset: sign * hyperplane.offset(&point),
                    };
                    if max.as_ref().is_none_or(|m| current.offset > m.offset) {
                        next = max.replace(current);
                    } else if next.as_ref().is_none_or(|n| current.offset > n.offset) {
                        next = Some(current);
                    }
                }

                let Some(max) = max else {
                    return Ok(point);
                };
                if max.point_is_inside() {
                    return Ok(point);
                }

                point = match next.filter(|n| !n.point_is_inside()) {
                    None => max.move_point(&point, stage_factor),
                    Some(next) => {
                        let p1 = max.move_point(&point, stage_factor);
                        let p2 = next.move_point(&point, stage_factor);
                        p1.move_towards(&p2, 0.5)
                    }
                };
            }
            log::trace!("cell {}: stage {stage} with factor {stage_factor} did not conclude", self.cell);
        }

        log::debug!("no inside point found for cell {} after {MAX_STAGES} stages", self.cell);
        Err(RegionError::InsidePointNotFound { stages: MAX_STAGES })
    }
}

/// Visitor retaining the inside leaf whose interior point is farthest from
/// its cell walls.
///
/// Cells where no interior point can be found are skipped.
#[derive(Debug)]
pub struct InteriorPointFinder<P> {
    default_point: P,
    best: Option<InteriorPoint<P>>,
}

impl<P: Point> InteriorPointFinder<P> {
    /// Creates a finder; `default_point` seeds cells without facets.
    pub fn new(default_point: P) -> Self {
        Self {
            default_point,
            best: None,
        }
    }

    /// Consumes the finder, returning the best interior point.
    pub fn into_best(self) -> Option<InteriorPoint<P>> {
        self.best
    }
}

impl<H: Hyperplane> BspTreeVisitor<H> for InteriorPointFinder<H::Point> {
    fn visit_order(&mut self, _tree: &BspTree<H>, _node: NodeId) -> Order {
        Order::PlusMinusSub
    }

    fn visit_internal_node(&mut self, _tree: &BspTree<H>, _node: NodeId) {}

    fn visit_leaf_node(&mut self, tree: &BspTree<H>, node: NodeId) {
        if tree.attribute(node).flag() != Some(true) {
            return;
        }
        match tree.interior_point(node, &self.default_point) {
            Ok(candidate) => {
                if self.best.as_ref().is_none_or(|b| candidate.distance() > b.distance()) {
                    self.best = Some(candidate);
                }
            }
            Err(e) => log::debug!("skipping cell {node}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::Attribute;
    use crate::euclidean::{Line, OrientedPoint};
    use nalgebra::{Point1, Point2};

    const TOL: f64 = 1.0e-10;

    /// Cell between y = 0 and a line through the origin at `angle`.
    fn wedge(angle: f64) -> (BspTree<Line>, NodeId) {
        let mut tree = BspTree::new(Attribute::Inside(false));
        let root = tree.root();
        // minus side of the first line is y > 0
        let bottom = Line::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), TOL);
        // minus side of the second line is below it
        let top = Line::from_points(Point2::new(angle.cos(), angle.sin()), Point2::new(0.0, 0.0), TOL);
        assert!(tree.insert_cut(root, &bottom));
        let minus = tree.minus(root).unwrap();
        assert!(tree.insert_cut(minus, &top));
        let cell = tree.minus(minus).unwrap();
        tree.set_attribute(cell, Attribute::Inside(true));
        (tree, cell)
    }

    #[test]
    fn root_cell_returns_start() {
        let tree: BspTree<OrientedPoint> = BspTree::new(Attribute::Inside(true));
        let finder = InsideCellFinder::new(&tree, tree.root());
        let p = finder.find_inside_point(Point1::new(42.0)).unwrap();
        assert_eq!(p, Point1::new(42.0));
    }

    #[test]
    fn point_already_inside_is_kept() {
        let (tree, cell) = wedge(0.5);
        let start = Point2::new(1.0, 0.1);
        let p = InsideCellFinder::new(&tree, cell).find_inside_point(start).unwrap();
        assert_eq!(p, start);
    }

    #[test]
    fn single_bad_wall_moves_point() {
        let (tree, cell) = wedge(0.5);
        let p = InsideCellFinder::new(&tree, cell)
            .find_inside_point(Point2::new(1.0, -0.2))
            .unwrap();
        assert!(p.y > TOL);
        assert_eq!(tree.cell(tree.root(), &p, TOL), cell);
    }

    #[test]
    fn thin_wedge_from_vertex() {
        let (tree, cell) = wedge(1.0e-3);
        let p = InsideCellFinder::new(&tree, cell)
            .find_inside_point(Point2::origin())
            .unwrap();
        for (hyperplane, on_plus) in tree.walls(cell) {
            let offset = hyperplane.offset(&p);
            let inside_offset = if on_plus { -offset } else { offset };
            assert!(inside_offset < -TOL, "offset {inside_offset} not inside");
        }
        assert_eq!(tree.cell(tree.root(), &p, TOL), cell);
    }

    #[test]
    fn finder_keeps_most_robust_point() {
        // [0, 1] and [2, 5]: the second interval leaves more room
        let mut tree = BspTree::new(Attribute::Inside(false));
        let root = tree.root();
        for (x, direct) in [(0.0, true), (1.0, true), (2.0, true), (5.0, true)] {
            let leaf = tree.cell(root, &Point1::new(x + 1.0e-3), TOL);
            assert!(tree.insert_cut(leaf, &OrientedPoint::new(x, direct, TOL)));
            let (plus, minus) = tree.children(leaf).unwrap();
            tree.set_attribute(minus, Attribute::Inside(false));
            tree.set_attribute(plus, Attribute::Inside(false));
        }
        for x in [0.5, 3.5] {
            let leaf = tree.cell(root, &Point1::new(x), TOL);
            tree.set_attribute(leaf, Attribute::Inside(true));
        }

        let mut finder = InteriorPointFinder::new(Point1::new(0.0));
        tree.visit(&mut finder);
        let best = finder.into_best().unwrap();
        assert!(best.point().x > 2.0 && best.point().x < 5.0);
        assert!(best.distance() > 0.5);
    }
}
