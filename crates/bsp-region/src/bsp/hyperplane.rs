//! Capability traits the partitioning kernel programs against.
//!
//! The kernel never looks inside concrete geometry. Everything it needs from
//! a space is expressed here: points that can be measured and interpolated,
//! hyperplanes that can compute offsets and build their own fragments, and
//! fragments (sub-hyperplanes) that can be split, reunited and queried.
//!
//! A space whose hyperplanes have a lower-dimensional sub-space implements
//! [`Embedding`], which lets boundary logic dive one dimension down.

use std::fmt::Debug;

use super::region::{Location, Properties, Region};

/// A point of some space.
pub trait Point: Clone + Debug {
    /// Distance between two points.
    fn distance(&self, other: &Self) -> f64;

    /// Point located at `ratio` of the way from `self` to `other`.
    ///
    /// A ratio of 0 gives `self`, a ratio of 1 gives `other`.
    fn move_towards(&self, other: &Self, ratio: f64) -> Self;
}

/// An affine map of a space onto itself.
///
/// Hyperplanes and fragments rebuild themselves from mapped points, so the
/// map only has to transform points. It must be affine for the rebuilt
/// hyperplanes to be exact.
pub trait Transform<P> {
    /// Maps a point.
    fn apply(&self, point: &P) -> P;
}

impl<P, F> Transform<P> for F
where
    F: Fn(&P) -> P,
{
    fn apply(&self, point: &P) -> P {
        self(point)
    }
}

/// An oriented hyperplane: a point in 1-D, a line in 2-D, a plane in 3-D.
///
/// The hyperplane splits space into a plus side (positive offsets) and a
/// minus side (negative offsets).
pub trait Hyperplane: Clone + Debug + Sized {
    /// Points of the space this hyperplane lives in.
    type Point: Point;

    /// Fragments of this hyperplane.
    type Sub: SubHyperplane<Self>;

    /// Signed offset of a point, positive on the plus side.
    fn offset(&self, point: &Self::Point) -> f64;

    /// Moves a point orthogonally to the hyperplane until its offset is `offset`.
    fn move_to_offset(&self, point: &Self::Point, offset: f64) -> Self::Point;

    /// Some point lying on the hyperplane.
    fn arbitrary_point(&self) -> Self::Point;

    /// Orthogonal projection of a point on the hyperplane.
    fn project(&self, point: &Self::Point) -> Self::Point;

    /// Distance under which points are considered to lie on the hyperplane.
    fn tolerance(&self) -> f64;

    /// Checks if two (parallel) hyperplanes have their plus sides on the same side.
    fn same_orientation_as(&self, other: &Self) -> bool;

    /// Fragment covering the whole hyperplane.
    fn whole_hyperplane(&self) -> Self::Sub;

    /// Fragment covering nothing.
    fn empty_hyperplane(&self) -> Self::Sub;

    /// Image of the hyperplane under an affine map.
    ///
    /// The plus side of the image is the image of the plus side.
    fn transformed<T: Transform<Self::Point> + ?Sized>(&self, transform: &T) -> Self;

    /// Region covering the whole space, using this hyperplane's tolerance.
    fn whole_space(&self) -> Region<Self> {
        Region::whole_space(self.tolerance())
    }

    /// Size and barycenter of a region of this space.
    ///
    /// This is the dimension-specific part of [`Region::size`] and
    /// [`Region::barycenter`]; the region caches the result.
    fn geometrical_properties(region: &Region<Self>) -> Properties<Self::Point>;
}

/// A hyperplane whose points can be expressed in a lower-dimensional sub-space.
pub trait Embedding: Hyperplane {
    /// Hyperplanes of the sub-space (one dimension lower).
    type SubSpace: Hyperplane;

    /// Coordinates of a point (assumed on the hyperplane) in the sub-space.
    fn to_sub_space(&self, point: &Self::Point) -> <Self::SubSpace as Hyperplane>::Point;

    /// Point of the space corresponding to sub-space coordinates.
    fn to_space(&self, point: &<Self::SubSpace as Hyperplane>::Point) -> Self::Point;

    /// Intersection of `other` with this hyperplane, as a sub-space hyperplane.
    ///
    /// The plus side of the returned hyperplane maps to the plus side of
    /// `other`. Returns `None` when both hyperplanes are parallel.
    fn trace(&self, other: &Self) -> Option<Self::SubSpace>;
}

/// Position of a fragment with respect to a hyperplane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Entirely on the plus side.
    Plus,
    /// Entirely on the minus side.
    Minus,
    /// Crossing the hyperplane.
    Both,
    /// Lying on the hyperplane (or empty).
    Hyper,
}

/// The two parts of a fragment split by a hyperplane.
///
/// Empty parts are always stored as `None`, so [`SplitSubHyperplane::side`]
/// can be derived from which parts are present.
#[derive(Debug, Clone)]
pub struct SplitSubHyperplane<H: Hyperplane> {
    plus: Option<H::Sub>,
    minus: Option<H::Sub>,
}

impl<H: Hyperplane> SplitSubHyperplane<H> {
    /// Builds a split, dropping empty parts.
    pub fn new(plus: Option<H::Sub>, minus: Option<H::Sub>) -> Self {
        Self {
            plus: plus.filter(|s| !s.is_empty()),
            minus: minus.filter(|s| !s.is_empty()),
        }
    }

    /// Part on the plus side, if any.
    #[inline]
    pub fn plus(&self) -> Option<&H::Sub> {
        self.plus.as_ref()
    }

    /// Part on the minus side, if any.
    #[inline]
    pub fn minus(&self) -> Option<&H::Sub> {
        self.minus.as_ref()
    }

    /// Consumes the split, returning `(plus, minus)`.
    #[inline]
    pub fn into_parts(self) -> (Option<H::Sub>, Option<H::Sub>) {
        (self.plus, self.minus)
    }

    /// Which side(s) of the hyperplane the original fragment covered.
    pub fn side(&self) -> Side {
        match (&self.plus, &self.minus) {
            (Some(_), Some(_)) => Side::Both,
            (Some(_), None) => Side::Plus,
            (None, Some(_)) => Side::Minus,
            (None, None) => Side::Hyper,
        }
    }
}

/// A fragment of a hyperplane.
pub trait SubHyperplane<H: Hyperplane>: Clone + Debug {
    /// The hyperplane supporting the fragment.
    fn hyperplane(&self) -> &H;

    /// Checks if the fragment covers nothing.
    fn is_empty(&self) -> bool;

    /// Measure of the fragment (length, area, ...); may be infinite.
    fn size(&self) -> f64;

    /// Barycenter of the fragment, `None` if empty or unbounded.
    fn barycenter(&self) -> Option<H::Point>;

    /// Splits the fragment by a hyperplane.
    fn split(&self, hyperplane: &H) -> SplitSubHyperplane<H>;

    /// Union with another fragment of the same hyperplane.
    fn reunite(&self, other: &Self) -> Self;

    /// Image of the fragment under an affine map.
    fn transformed<T: Transform<H::Point> + ?Sized>(&self, transform: &T) -> Self;

    /// Location of a point lying on the hyperplane with respect to the fragment.
    fn check_point(&self, point: &H::Point) -> Location;

    /// Closest point of the fragment's own boundary, if it has one.
    ///
    /// For a face of a polyhedron this is the closest point on the face's
    /// edges; a point fragment has no boundary.
    fn project_to_boundary(&self, point: &H::Point) -> Option<H::Point>;

    /// A point strictly inside the fragment, if it is not empty.
    fn interior_point(&self) -> Option<H::Point>;
}
