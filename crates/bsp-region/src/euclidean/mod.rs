//! Euclidean geometries built on the partitioning kernel.
//!
//! - [`OrientedPoint`]: hyperplanes of the real line, regions are unions of intervals
//! - [`Line`]: hyperplanes of the plane, regions are polygons
//! - [`Plane`]: hyperplanes of 3D space, regions are polyhedra
//!
//! Each dimension uses the one below as the sub-space of its hyperplanes, so
//! the boundary of a polyhedron is made of polygons expressed in their plane
//! frame, whose boundaries are intervals on lines.

mod line;
mod oned;
mod plane;

pub use line::{Line, SubLine, polygon, segment};
pub use oned::{OrientedPoint, SubOrientedPoint, interval};
pub use plane::{Plane, SubPlane, cuboid, face};

use nalgebra::SVector;

use crate::bsp::{BspTree, BspTreeVisitor, Hyperplane, NodeId, Order, Properties, Region, SubHyperplane};

/// Default tolerance for point classification.
/// Points within this distance of a hyperplane are considered on it.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Threshold on the sine of the angle between two hyperplanes under which
/// they are considered parallel.
pub const PARALLEL_EPSILON: f64 = 1e-10;

impl<const D: usize> crate::bsp::Point for nalgebra::Point<f64, D> {
    #[inline]
    fn distance(&self, other: &Self) -> f64 {
        nalgebra::distance(self, other)
    }

    #[inline]
    fn move_towards(&self, other: &Self, ratio: f64) -> Self {
        self + (other - self) * ratio
    }
}

/// Size and barycenter of a `D`-dimensional region from its boundary.
///
/// Each boundary facet is the base of a cone with apex at the origin. The
/// signed cone volume is `size · h / D` where `h` is the distance from the
/// origin to the facet hyperplane, counted positive when the facet normal
/// points outwards, and the cone barycenter lies at `D / (D + 1)` of the way
/// to the facet barycenter.
///
/// A facet of infinite size or a negative total means the region is
/// unbounded; both report an infinite size and no barycenter.
pub(crate) fn facet_properties<H, const D: usize>(region: &Region<H>) -> Properties<nalgebra::Point<f64, D>>
where
    H: Hyperplane<Point = nalgebra::Point<f64, D>>,
{
    let mut visitor = FacetSum::<D>::new();
    region.tree(true).visit(&mut visitor);

    if visitor.unbounded || visitor.sum < 0.0 {
        return Properties::new(f64::INFINITY, None);
    }
    if visitor.sum == 0.0 {
        // no boundary at all: either nothing or everything
        return if region.is_empty() {
            Properties::new(0.0, None)
        } else {
            Properties::new(f64::INFINITY, None)
        };
    }

    let scale = D as f64 / (D as f64 + 1.0);
    let barycenter = nalgebra::Point::from(visitor.weighted * (scale / visitor.sum));
    Properties::new(visitor.sum, Some(barycenter))
}

/// Accumulates the cone contributions of every boundary facet.
struct FacetSum<const D: usize> {
    sum: f64,
    weighted: SVector<f64, D>,
    unbounded: bool,
}

impl<const D: usize> FacetSum<D> {
    fn new() -> Self {
        Self {
            sum: 0.0,
            weighted: SVector::zeros(),
            unbounded: false,
        }
    }
}

impl<H, const D: usize> BspTreeVisitor<H> for FacetSum<D>
where
    H: Hyperplane<Point = nalgebra::Point<f64, D>>,
{
    fn visit_order(&mut self, _tree: &BspTree<H>, _node: NodeId) -> Order {
        Order::MinusSubPlus
    }

    fn visit_internal_node(&mut self, tree: &BspTree<H>, node: NodeId) {
        if self.unbounded {
            return;
        }
        let Some(boundary) = tree.attribute(node).boundary() else {
            return;
        };

        for (part, reversed) in boundary.parts() {
            let size = part.size();
            let Some(barycenter) = part.barycenter().filter(|_| size.is_finite()) else {
                self.unbounded = true;
                return;
            };
            let height = -part.hyperplane().offset(&nalgebra::Point::origin());
            let sign = if reversed { -1.0 } else { 1.0 };
            let cone = sign * size * height / D as f64;
            self.sum += cone;
            self.weighted += barycenter.coords * cone;
        }
    }

    fn visit_leaf_node(&mut self, _tree: &BspTree<H>, _node: NodeId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{Point, RegionFactory};
    use approx::assert_relative_eq;
    use nalgebra::{Point2, Point3, Vector3};

    const TOL: f64 = DEFAULT_TOLERANCE;

    #[test]
    fn point_distance_and_interpolation() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, 4.0, 4.0);
        assert_relative_eq!(a.distance(&b), 6.0);
        assert_relative_eq!(a.move_towards(&b, 0.25), Point3::new(0.5, 1.0, 1.0));
        assert_relative_eq!(a.move_towards(&b, 1.0), b);
    }

    #[test]
    fn triangle_properties() {
        let triangle = polygon(&[Point2::new(0.0, 0.0), Point2::new(3.0, 0.0), Point2::new(0.0, 3.0)], TOL);
        assert_relative_eq!(triangle.size(), 4.5, epsilon = 1.0e-12);
        let barycenter = triangle.barycenter().unwrap();
        assert_relative_eq!(barycenter.x, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(barycenter.y, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn properties_away_from_origin() {
        let cube = cuboid(Point3::new(10.0, 20.0, 30.0), Point3::new(12.0, 21.0, 34.0), TOL).unwrap();
        assert_relative_eq!(cube.size(), 8.0, epsilon = 1.0e-9);
        assert_relative_eq!(cube.barycenter().unwrap().coords, Vector3::new(11.0, 20.5, 32.0), epsilon = 1.0e-9);
    }

    #[test]
    fn unbounded_regions_have_infinite_size() {
        let square = polygon(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            TOL,
        );
        let outside = RegionFactory.complement(&square);
        assert!(outside.size().is_infinite());
        assert!(outside.barycenter().is_none());

        let half_plane = Line::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), TOL);
        let region = Region::from_hyperplanes(&[half_plane], TOL).unwrap();
        assert!(region.size().is_infinite());
        assert!(region.barycenter().is_none());
    }

    #[test]
    fn whole_and_empty_space_properties() {
        let full: Region<Plane> = Region::whole_space(TOL);
        assert!(full.size().is_infinite());
        let empty: Region<Plane> = Region::empty(TOL);
        assert_eq!(empty.size(), 0.0);
        assert!(empty.barycenter().is_none());
    }

    #[test]
    fn hyperplane_whole_space_uses_its_tolerance() {
        let point = OrientedPoint::new(1.0, true, 1.0e-6);
        let line = Line::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), 1.0e-7);
        let plane = Plane::from_point_and_normal(Point3::origin(), Vector3::z(), 1.0e-8);

        let space = point.whole_space();
        assert!(space.is_full());
        assert_eq!(space.tolerance(), 1.0e-6);
        assert!(line.whole_space().is_full());
        assert_eq!(line.whole_space().tolerance(), 1.0e-7);
        assert!(plane.whole_space().is_full());
        assert_eq!(plane.whole_space().tolerance(), 1.0e-8);
    }
}
