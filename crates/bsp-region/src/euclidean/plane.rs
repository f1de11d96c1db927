//! Oriented planes of 3D space, and polyhedra.

use nalgebra::{Point2, Point3, Vector2, Vector3};

use crate::bsp::{EmbeddedSubHyperplane, Embedding, Hyperplane, Properties, Region, RegionFactory, Transform};
use crate::error::RegionError;

use super::line::{Line, polygon};
use super::{PARALLEL_EPSILON, facet_properties};

/// Part of a plane: a union of polygons, possibly unbounded.
pub type SubPlane = EmbeddedSubHyperplane<Plane>;

/// An oriented plane of 3D space.
///
/// The plus side is the side the normal points to. Points of the plane are
/// expressed in an orthonormal frame `(u, v)` with `u × v` equal to the
/// normal, so counterclockwise loops in the frame face the plus side.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    origin_offset: f64,
    u: Vector3<f64>,
    v: Vector3<f64>,
    w: Vector3<f64>,
    tolerance: f64,
}

impl Plane {
    /// Creates a plane from a point on the plane and a normal vector.
    /// The normal will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    pub fn from_point_and_normal(point: Point3<f64>, normal: Vector3<f64>, tolerance: f64) -> Self {
        let norm = normal.norm();
        assert!(norm > f64::EPSILON, "Plane normal cannot be zero");
        let w = normal / norm;
        let u = orthogonal(&w);
        Self {
            origin_offset: -w.dot(&point.coords),
            u,
            v: w.cross(&u),
            w,
            tolerance,
        }
    }

    /// Creates a plane from three non-collinear points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// # Panics
    /// Panics if the points are collinear (or nearly so).
    pub fn from_three_points(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>, tolerance: f64) -> Self {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)), tolerance)
    }

    /// Unit normal pointing to the plus side.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.w
    }

    /// Point of the plane closest to the origin, origin of the plane frame.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        Point3::from(self.w * -self.origin_offset)
    }

    /// Same plane with the opposite orientation.
    ///
    /// The frame is swapped to `(v, u)` to stay consistent with the normal.
    pub fn reversed(&self) -> Self {
        Self {
            origin_offset: -self.origin_offset,
            u: self.v,
            v: self.u,
            w: -self.w,
            tolerance: self.tolerance,
        }
    }
}

/// Some unit vector orthogonal to a unit vector.
fn orthogonal(w: &Vector3<f64>) -> Vector3<f64> {
    let threshold = 0.6;
    if w.x.abs() <= threshold {
        Vector3::new(0.0, w.z, -w.y).normalize()
    } else if w.y.abs() <= threshold {
        Vector3::new(-w.z, 0.0, w.x).normalize()
    } else {
        Vector3::new(w.y, -w.x, 0.0).normalize()
    }
}

impl Hyperplane for Plane {
    type Point = Point3<f64>;
    type Sub = SubPlane;

    #[inline]
    fn offset(&self, point: &Point3<f64>) -> f64 {
        self.w.dot(&point.coords) + self.origin_offset
    }

    fn move_to_offset(&self, point: &Point3<f64>, offset: f64) -> Point3<f64> {
        point + self.w * (offset - self.offset(point))
    }

    fn arbitrary_point(&self) -> Point3<f64> {
        self.origin()
    }

    fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.w * self.offset(point)
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn same_orientation_as(&self, other: &Self) -> bool {
        self.w.dot(&other.w) > 0.0
    }

    fn whole_hyperplane(&self) -> SubPlane {
        SubPlane::new(self.clone(), Region::whole_space(self.tolerance))
    }

    fn empty_hyperplane(&self) -> SubPlane {
        SubPlane::new(self.clone(), Region::empty(self.tolerance))
    }

    fn transformed<T: Transform<Point3<f64>> + ?Sized>(&self, transform: &T) -> Self {
        let origin = self.origin();
        let image = Self::from_three_points(
            transform.apply(&origin),
            transform.apply(&(origin + self.u)),
            transform.apply(&(origin + self.v)),
            self.tolerance,
        );
        let plus = transform.apply(&(origin + self.w));
        if image.offset(&plus) < 0.0 { image.reversed() } else { image }
    }

    fn geometrical_properties(region: &Region<Self>) -> Properties<Point3<f64>> {
        facet_properties::<Self, 3>(region)
    }
}

impl Embedding for Plane {
    type SubSpace = Line;

    fn to_sub_space(&self, point: &Point3<f64>) -> Point2<f64> {
        Point2::new(self.u.dot(&point.coords), self.v.dot(&point.coords))
    }

    fn to_space(&self, point: &Point2<f64>) -> Point3<f64> {
        Point3::from(self.u * point.x + self.v * point.y - self.w * self.origin_offset)
    }

    fn trace(&self, other: &Self) -> Option<Line> {
        // offset to `other` in the frame is `gradient · (x, y) + shift`
        let gradient = Vector2::new(other.w.dot(&self.u), other.w.dot(&self.v));
        let norm = gradient.norm();
        if norm < PARALLEL_EPSILON {
            return None;
        }
        let normal = gradient / norm;
        let shift = (other.origin_offset - self.origin_offset * other.w.dot(&self.w)) / norm;
        Some(Line::from_point_and_direction(
            Point2::from(normal * -shift),
            Vector2::new(-normal.y, normal.x),
            self.tolerance,
        ))
    }
}

/// Planar polygonal face, oriented so that its vertices turn
/// counterclockwise when seen from the plus side.
///
/// # Panics
/// Panics if there are fewer than three vertices, or if the first three
/// are collinear.
pub fn face(vertices: &[Point3<f64>], tolerance: f64) -> SubPlane {
    assert!(vertices.len() >= 3, "a face needs at least three vertices");
    let plane = Plane::from_three_points(vertices[0], vertices[1], vertices[2], tolerance);
    let loop2d: Vec<Point2<f64>> = vertices.iter().map(|p| plane.to_sub_space(p)).collect();
    SubPlane::new(plane, polygon(&loop2d, tolerance))
}

/// Axis-aligned box between two opposite corners.
///
/// # Errors
/// Returns [`RegionError::NotConvex`] if `min` is above `max` on some axis.
pub fn cuboid(min: Point3<f64>, max: Point3<f64>, tolerance: f64) -> Result<Region<Plane>, RegionError> {
    let planes: Vec<Plane> = [Vector3::x(), Vector3::y(), Vector3::z()]
        .into_iter()
        .flat_map(|axis| {
            [
                Plane::from_point_and_normal(max, axis, tolerance),
                Plane::from_point_and_normal(min, -axis, tolerance),
            ]
        })
        .collect();
    RegionFactory.build_convex(&planes)
}
