//! Oriented points, the hyperplanes of the real line.

use nalgebra::Point1;

use crate::bsp::{Hyperplane, Location, Properties, Region, SplitSubHyperplane, SubHyperplane, Transform};

use super::facet_properties;

/// A point of the real line with an orientation.
///
/// A direct point has its plus side towards increasing abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedPoint {
    location: Point1<f64>,
    direct: bool,
    tolerance: f64,
}

impl OrientedPoint {
    /// Creates an oriented point at abscissa `x`.
    pub fn new(x: f64, direct: bool, tolerance: f64) -> Self {
        Self {
            location: Point1::new(x),
            direct,
            tolerance,
        }
    }

    /// Location of the point.
    #[inline]
    pub fn location(&self) -> Point1<f64> {
        self.location
    }

    /// Checks if the plus side is towards increasing abscissas.
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    /// Same point with the opposite orientation.
    pub fn reversed(&self) -> Self {
        Self {
            direct: !self.direct,
            ..self.clone()
        }
    }
}

impl Hyperplane for OrientedPoint {
    type Point = Point1<f64>;
    type Sub = SubOrientedPoint;

    #[inline]
    fn offset(&self, point: &Point1<f64>) -> f64 {
        let delta = point.x - self.location.x;
        if self.direct { delta } else { -delta }
    }

    fn move_to_offset(&self, _point: &Point1<f64>, offset: f64) -> Point1<f64> {
        let delta = if self.direct { offset } else { -offset };
        Point1::new(self.location.x + delta)
    }

    fn arbitrary_point(&self) -> Point1<f64> {
        self.location
    }

    fn project(&self, _point: &Point1<f64>) -> Point1<f64> {
        self.location
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn same_orientation_as(&self, other: &Self) -> bool {
        self.direct == other.direct
    }

    fn whole_hyperplane(&self) -> SubOrientedPoint {
        SubOrientedPoint {
            hyperplane: self.clone(),
            empty: false,
        }
    }

    fn empty_hyperplane(&self) -> SubOrientedPoint {
        SubOrientedPoint {
            hyperplane: self.clone(),
            empty: true,
        }
    }

    fn transformed<T: Transform<Point1<f64>> + ?Sized>(&self, transform: &T) -> Self {
        let location = transform.apply(&self.location);
        let shifted = transform.apply(&Point1::new(self.location.x + 1.0));
        // a reflection swaps the sides
        let direct = (shifted.x > location.x) == self.direct;
        Self {
            location,
            direct,
            tolerance: self.tolerance,
        }
    }

    fn geometrical_properties(region: &Region<Self>) -> Properties<Point1<f64>> {
        if reaches_infinity(region, false) || reaches_infinity(region, true) {
            return Properties::new(f64::INFINITY, None);
        }
        facet_properties::<Self, 1>(region)
    }
}

/// Checks if the cell extending to infinity on one side is inside.
fn reaches_infinity(region: &Region<OrientedPoint>, positive: bool) -> bool {
    let tree = region.tree(false);
    let mut node = tree.root();
    while let (Some(h), Some((plus, minus))) = (tree.hyperplane(node), tree.children(node)) {
        node = if h.direct == positive { plus } else { minus };
    }
    region.is_full_at(node)
}

/// Fragment of an oriented point: the point itself, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct SubOrientedPoint {
    hyperplane: OrientedPoint,
    empty: bool,
}

impl SubHyperplane<OrientedPoint> for SubOrientedPoint {
    fn hyperplane(&self) -> &OrientedPoint {
        &self.hyperplane
    }

    fn is_empty(&self) -> bool {
        self.empty
    }

    /// A point fragment counts as one.
    fn size(&self) -> f64 {
        if self.empty { 0.0 } else { 1.0 }
    }

    fn barycenter(&self) -> Option<Point1<f64>> {
        (!self.empty).then_some(self.hyperplane.location)
    }

    fn split(&self, hyperplane: &OrientedPoint) -> SplitSubHyperplane<OrientedPoint> {
        let offset = hyperplane.offset(&self.hyperplane.location);
        let tolerance = hyperplane.tolerance();
        if offset < -tolerance {
            SplitSubHyperplane::new(None, Some(self.clone()))
        } else if offset > tolerance {
            SplitSubHyperplane::new(Some(self.clone()), None)
        } else {
            SplitSubHyperplane::new(None, None)
        }
    }

    fn reunite(&self, other: &Self) -> Self {
        Self {
            hyperplane: self.hyperplane.clone(),
            empty: self.empty && other.empty,
        }
    }

    fn transformed<T: Transform<Point1<f64>> + ?Sized>(&self, transform: &T) -> Self {
        Self {
            hyperplane: self.hyperplane.transformed(transform),
            empty: self.empty,
        }
    }

    fn check_point(&self, _point: &Point1<f64>) -> Location {
        if self.empty {
            Location::Outside
        } else {
            Location::Inside
        }
    }

    fn project_to_boundary(&self, _point: &Point1<f64>) -> Option<Point1<f64>> {
        None
    }

    fn interior_point(&self) -> Option<Point1<f64>> {
        self.barycenter()
    }
}

/// Closed interval `[lower, upper]` of the real line.
///
/// Infinite bounds give half-lines or the whole line; `lower > upper`
/// gives the empty region.
pub fn interval(lower: f64, upper: f64, tolerance: f64) -> Region<OrientedPoint> {
    if lower > upper {
        return Region::empty(tolerance);
    }
    let mut hyperplanes = Vec::with_capacity(2);
    if lower.is_finite() {
        hyperplanes.push(OrientedPoint::new(lower, false, tolerance));
    }
    if upper.is_finite() {
        hyperplanes.push(OrientedPoint::new(upper, true, tolerance));
    }
    if hyperplanes.is_empty() {
        return Region::whole_space(tolerance);
    }
    Region::from_hyperplanes(&hyperplanes, tolerance).unwrap_or_else(|_| Region::empty(tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{RegionFactory, Side};
    use approx::assert_relative_eq;

    const TOL: f64 = 1.0e-10;

    #[test]
    fn offsets_follow_orientation() {
        let direct = OrientedPoint::new(2.0, true, TOL);
        let indirect = direct.reversed();
        assert_relative_eq!(direct.offset(&Point1::new(5.0)), 3.0);
        assert_relative_eq!(indirect.offset(&Point1::new(5.0)), -3.0);
        assert_relative_eq!(indirect.move_to_offset(&Point1::new(0.0), 1.5).x, 0.5);
        assert!(!direct.same_orientation_as(&indirect));
    }

    #[test]
    fn split_point_fragment() {
        let sub = OrientedPoint::new(1.0, false, TOL).whole_hyperplane();
        assert_eq!(sub.split(&OrientedPoint::new(0.0, true, TOL)).side(), Side::Plus);
        assert_eq!(sub.split(&OrientedPoint::new(0.0, false, TOL)).side(), Side::Minus);
        assert_eq!(sub.split(&OrientedPoint::new(1.0, true, TOL)).side(), Side::Hyper);
        assert!(OrientedPoint::new(1.0, true, TOL).empty_hyperplane().is_empty());
    }

    #[test]
    fn reflection_flips_orientation() {
        let point = OrientedPoint::new(2.0, true, TOL);
        let mirrored = point.transformed(&|p: &Point1<f64>| Point1::new(-p.x));
        assert_relative_eq!(mirrored.location().x, -2.0);
        assert!(!mirrored.is_direct());
        // the image of the plus side is the plus side of the image
        assert!(mirrored.offset(&Point1::new(-3.0)) > 0.0);
    }

    #[test]
    fn interval_properties() {
        let region = interval(1.0, 4.0, TOL);
        assert_relative_eq!(region.size(), 3.0, epsilon = 1.0e-12);
        assert_relative_eq!(region.barycenter().unwrap().x, 2.5, epsilon = 1.0e-12);

        let two = RegionFactory.union(interval(0.0, 1.0, TOL), interval(3.0, 6.0, TOL));
        assert_relative_eq!(two.size(), 4.0, epsilon = 1.0e-12);
        // (0.5 * 1 + 4.5 * 3) / 4
        assert_relative_eq!(two.barycenter().unwrap().x, 3.5, epsilon = 1.0e-12);
    }

    #[test]
    fn unbounded_intervals() {
        for region in [
            interval(f64::NEG_INFINITY, 2.0, TOL),
            interval(-1.0, f64::INFINITY, TOL),
            interval(f64::NEG_INFINITY, f64::INFINITY, TOL),
        ] {
            assert!(region.size().is_infinite());
            assert!(region.barycenter().is_none());
        }
        assert_eq!(interval(-1.0, f64::INFINITY, TOL).check_point(&Point1::new(1.0e9)), Location::Inside);
    }

    #[test]
    fn inverted_interval_is_empty() {
        assert!(interval(2.0, 1.0, TOL).is_empty());
        assert!(interval(1.0, 1.0, TOL).is_empty());
    }
}
