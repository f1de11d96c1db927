//! Projection of points on region boundaries.

use super::hyperplane::{Hyperplane, Point, SubHyperplane};
use super::node::NodeId;
use super::region::{BoundaryProjection, Location};
use super::tree::BspTree;
use super::visitor::{BspTreeVisitor, Order};

/// Visitor computing the projection of a point on a region boundary.
///
/// The tree must carry boundary attributes. Subtrees on the side of the
/// point are visited first, so the first leaf reached is the cell of the
/// point and decides the sign of the offset.
#[derive(Debug, Clone)]
pub struct BoundaryProjector<P> {
    original: P,
    projected: Option<P>,
    leaf_inside: Option<bool>,
    offset: f64,
}

impl<P: Point> BoundaryProjector<P> {
    /// Creates a projector for a point.
    pub fn new(original: P) -> Self {
        Self {
            original,
            projected: None,
            leaf_inside: None,
            offset: f64::INFINITY,
        }
    }

    /// The projection found by the visit.
    pub fn projection(self) -> BoundaryProjection<P> {
        let offset = if self.leaf_inside == Some(true) {
            -self.offset
        } else {
            self.offset
        };
        BoundaryProjection::new(self.original, self.projected, offset)
    }
}

impl<H: Hyperplane> BspTreeVisitor<H> for BoundaryProjector<H::Point> {
    fn visit_order(&mut self, tree: &BspTree<H>, node: NodeId) -> Order {
        match tree.hyperplane(node) {
            Some(h) if h.offset(&self.original) > 0.0 => Order::PlusSubMinus,
            _ => Order::MinusSubPlus,
        }
    }

    fn visit_internal_node(&mut self, tree: &BspTree<H>, node: NodeId) {
        let Some(hyperplane) = tree.hyperplane(node) else {
            return;
        };
        let signed_offset = hyperplane.offset(&self.original);
        if signed_offset.abs() >= self.offset {
            return;
        }
        let Some(boundary) = tree.attribute(node).boundary() else {
            return;
        };

        let regular = hyperplane.project(&self.original);
        let parts: Vec<&H::Sub> = boundary.plus_inside().into_iter().chain(boundary.plus_outside()).collect();

        // the regular projection may fall inside a boundary fragment
        if parts.iter().any(|part| part.check_point(&regular) != Location::Outside) {
            self.projected = Some(regular);
            self.offset = signed_offset.abs();
            return;
        }

        // otherwise the closest point may be on a fragment edge or vertex
        for part in parts {
            if let Some(singular) = part.project_to_boundary(&regular) {
                let distance = self.original.distance(&singular);
                if distance < self.offset {
                    self.projected = Some(singular);
                    self.offset = distance;
                }
            }
        }
    }

    fn visit_leaf_node(&mut self, tree: &BspTree<H>, node: NodeId) {
        if self.leaf_inside.is_none() {
            self.leaf_inside = tree.attribute(node).flag();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{Region, RegionFactory};
    use crate::euclidean::{Line, Plane, cuboid, polygon};
    use approx::assert_relative_eq;
    use nalgebra::{Point2, Point3};

    const TOL: f64 = 1.0e-10;

    fn make_square() -> Region<Line> {
        polygon(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
                Point2::new(0.0, 2.0),
            ],
            TOL,
        )
    }

    fn drilled_cube() -> Region<Plane> {
        let cube = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 3.0, 3.0), TOL).unwrap();
        let hole = cuboid(Point3::new(1.0, 1.0, -1.0), Point3::new(2.0, 2.0, 4.0), TOL).unwrap();
        RegionFactory.difference(cube, hole)
    }

    #[test]
    fn projection_from_inside_square() {
        let square = make_square();
        let projection = square.project_to_boundary(&Point2::new(0.5, 1.0));
        assert_relative_eq!(projection.offset(), -0.5, epsilon = 1.0e-12);
        let p = projection.projected().unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = 1.0e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn projection_on_vertex() {
        // the closest boundary point is a corner, not a projection on an edge line
        let square = make_square();
        let projection = square.project_to_boundary(&Point2::new(3.0, 3.0));
        assert_relative_eq!(projection.offset(), 2.0_f64.sqrt(), epsilon = 1.0e-12);
        let p = projection.projected().unwrap();
        assert_relative_eq!(p.x, 2.0, epsilon = 1.0e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn projection_without_boundary() {
        let full: Region<Line> = Region::whole_space(TOL);
        let projection = full.project_to_boundary(&Point2::new(1.0, 1.0));
        assert!(projection.projected().is_none());
        assert_eq!(projection.offset(), f64::NEG_INFINITY);

        let empty: Region<Line> = Region::empty(TOL);
        let projection = empty.project_to_boundary(&Point2::new(1.0, 1.0));
        assert!(projection.projected().is_none());
        assert_eq!(projection.offset(), f64::INFINITY);
    }

    #[test]
    fn projection_matches_classification() {
        let square = make_square();
        for p in [
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.5, -1.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.9, 0.3),
        ] {
            let offset = square.project_to_boundary(&p).offset();
            match square.check_point(&p) {
                Location::Inside => assert!(offset < -TOL),
                Location::Outside => assert!(offset > TOL),
                Location::Boundary => assert!(offset.abs() <= TOL),
            }
        }
    }

    #[test]
    fn projection_to_hole_boundary() {
        let drilled = drilled_cube();
        assert_relative_eq!(drilled.size(), 27.0 - 3.0, epsilon = 1.0e-10);

        let center = Point3::new(1.5, 1.5, 1.5);
        assert_eq!(drilled.check_point(&center), Location::Outside);
        let projection = drilled.project_to_boundary(&center);
        assert!(projection.offset().is_finite());
        assert_relative_eq!(projection.offset(), 0.5, epsilon = 1.0e-10);

        // on one of the four lateral faces of the hole
        let p = projection.projected().unwrap();
        let on_face = [(p.x - 1.0).abs(), (p.x - 2.0).abs(), (p.y - 1.0).abs(), (p.y - 2.0).abs()]
            .iter()
            .any(|d| *d < 1.0e-10);
        assert!(on_face);
        assert_relative_eq!(p.z, 1.5, epsilon = 1.0e-10);
    }
}
