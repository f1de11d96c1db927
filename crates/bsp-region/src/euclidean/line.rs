//! Oriented lines of the plane, and polygons.

use nalgebra::{Point1, Point2, Vector2};

use crate::bsp::{EmbeddedSubHyperplane, Embedding, Hyperplane, Properties, Region, Transform};

use super::oned::{OrientedPoint, interval};
use super::{PARALLEL_EPSILON, facet_properties};

/// Part of a line: a union of segments, rays, or the whole line.
pub type SubLine = EmbeddedSubHyperplane<Line>;

/// An oriented line of the plane.
///
/// The plus side is on the right hand side when walking along the
/// direction. Abscissas along the direction are the sub-space coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    direction: Vector2<f64>,
    origin_offset: f64,
    tolerance: f64,
}

impl Line {
    /// Creates the line going through `p1` then `p2`.
    ///
    /// # Panics
    /// Panics if both points coincide.
    pub fn from_points(p1: Point2<f64>, p2: Point2<f64>, tolerance: f64) -> Self {
        Self::from_point_and_direction(p1, p2 - p1, tolerance)
    }

    /// Creates the line through `point` along `direction`.
    /// The direction will be normalized automatically.
    ///
    /// # Panics
    /// Panics if the direction has zero length.
    pub fn from_point_and_direction(point: Point2<f64>, direction: Vector2<f64>, tolerance: f64) -> Self {
        let norm = direction.norm();
        assert!(norm > f64::EPSILON, "Line direction cannot be zero");
        let direction = direction / norm;
        let normal = Vector2::new(direction.y, -direction.x);
        Self {
            direction,
            origin_offset: -normal.dot(&point.coords),
            tolerance,
        }
    }

    /// Unit direction of the line.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        self.direction
    }

    /// Unit normal pointing to the plus side.
    #[inline]
    pub fn normal(&self) -> Vector2<f64> {
        Vector2::new(self.direction.y, -self.direction.x)
    }

    /// Same line with the opposite orientation.
    pub fn reversed(&self) -> Self {
        Self {
            direction: -self.direction,
            origin_offset: -self.origin_offset,
            tolerance: self.tolerance,
        }
    }

    /// Intersection point with another line, `None` if they are parallel.
    pub fn intersection(&self, other: &Line) -> Option<Point2<f64>> {
        self.trace(other).map(|p| self.to_space(&p.location()))
    }
}

impl Hyperplane for Line {
    type Point = Point2<f64>;
    type Sub = SubLine;

    #[inline]
    fn offset(&self, point: &Point2<f64>) -> f64 {
        self.normal().dot(&point.coords) + self.origin_offset
    }

    fn move_to_offset(&self, point: &Point2<f64>, offset: f64) -> Point2<f64> {
        point + self.normal() * (offset - self.offset(point))
    }

    fn arbitrary_point(&self) -> Point2<f64> {
        self.to_space(&Point1::new(0.0))
    }

    fn project(&self, point: &Point2<f64>) -> Point2<f64> {
        self.to_space(&self.to_sub_space(point))
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn same_orientation_as(&self, other: &Self) -> bool {
        self.direction.dot(&other.direction) >= 0.0
    }

    fn whole_hyperplane(&self) -> SubLine {
        SubLine::new(self.clone(), Region::whole_space(self.tolerance))
    }

    fn empty_hyperplane(&self) -> SubLine {
        SubLine::new(self.clone(), Region::empty(self.tolerance))
    }

    fn transformed<T: Transform<Point2<f64>> + ?Sized>(&self, transform: &T) -> Self {
        let p0 = self.arbitrary_point();
        let image = Self::from_points(
            transform.apply(&p0),
            transform.apply(&(p0 + self.direction)),
            self.tolerance,
        );
        let plus = transform.apply(&(p0 + self.normal()));
        if image.offset(&plus) < 0.0 { image.reversed() } else { image }
    }

    fn geometrical_properties(region: &Region<Self>) -> Properties<Point2<f64>> {
        facet_properties::<Self, 2>(region)
    }
}

impl Embedding for Line {
    type SubSpace = OrientedPoint;

    fn to_sub_space(&self, point: &Point2<f64>) -> Point1<f64> {
        Point1::new(self.direction.dot(&point.coords))
    }

    fn to_space(&self, point: &Point1<f64>) -> Point2<f64> {
        Point2::from(self.direction * point.x - self.normal() * self.origin_offset)
    }

    fn trace(&self, other: &Self) -> Option<OrientedPoint> {
        let other_normal = other.normal();
        let slope = other_normal.dot(&self.direction);
        if slope.abs() < PARALLEL_EPSILON {
            return None;
        }
        // offset to `other` along this line is `slope * x + shift`
        let shift = -self.origin_offset * other_normal.dot(&self.normal()) + other.origin_offset;
        Some(OrientedPoint::new(-shift / slope, slope > 0.0, self.tolerance))
    }
}

/// Segment from `start` to `end`, on the line oriented from `start` to `end`.
///
/// # Panics
/// Panics if both points coincide.
pub fn segment(start: Point2<f64>, end: Point2<f64>, tolerance: f64) -> SubLine {
    let line = Line::from_points(start, end, tolerance);
    let lower = line.to_sub_space(&start).x;
    let upper = line.to_sub_space(&end).x;
    SubLine::new(line, interval(lower, upper, tolerance))
}

/// Polygon bounded by a closed loop of vertices.
///
/// Vertices are given counterclockwise, so the inside is on the left of
/// every edge; a clockwise loop gives the complement. Consecutive vertices
/// closer than the tolerance are merged.
pub fn polygon(vertices: &[Point2<f64>], tolerance: f64) -> Region<Line> {
    let edges = vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .filter(|(start, end)| nalgebra::distance(*start, *end) > tolerance)
        .map(|(start, end)| segment(*start, *end, tolerance));
    Region::from_boundary(edges, tolerance)
}
