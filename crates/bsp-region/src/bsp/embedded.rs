//! Fragments of hyperplanes that have their own sub-space.
//!
//! A fragment is stored as its hyperplane plus the region of the
//! hyperplane's sub-space it covers: a segment of a line is an interval of
//! abscissas, a face of a polyhedron is a polygon in the plane frame. The
//! generic operations dive into that sub-space region, which is what makes
//! the kernel work in any dimension.

use super::factory::RegionFactory;
use super::hyperplane::{Embedding, Hyperplane, SplitSubHyperplane, SubHyperplane, Transform};
use super::node::Attribute;
use super::region::{Location, Region};
use super::tree::BspTree;

/// Sub-space point type of an embedding hyperplane.
type SubPoint<H> = <<H as Embedding>::SubSpace as Hyperplane>::Point;

/// A hyperplane together with the part of it that the fragment covers.
#[derive(Debug, Clone)]
pub struct EmbeddedSubHyperplane<H: Embedding> {
    hyperplane: H,
    remaining: Region<H::SubSpace>,
}

impl<H: Embedding> EmbeddedSubHyperplane<H> {
    /// Creates a fragment from its hyperplane and a region of the
    /// hyperplane's sub-space.
    pub fn new(hyperplane: H, remaining: Region<H::SubSpace>) -> Self {
        Self { hyperplane, remaining }
    }

    /// Region of the sub-space covered by the fragment.
    pub fn remaining_region(&self) -> &Region<H::SubSpace> {
        &self.remaining
    }
}

impl<H> SubHyperplane<H> for EmbeddedSubHyperplane<H>
where
    H: Embedding<Sub = EmbeddedSubHyperplane<H>>,
{
    fn hyperplane(&self) -> &H {
        &self.hyperplane
    }

    fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    fn size(&self) -> f64 {
        self.remaining.size()
    }

    fn barycenter(&self) -> Option<H::Point> {
        self.remaining.barycenter().map(|b| self.hyperplane.to_space(b))
    }

    /// Splits the fragment by the trace of `other` in the fragment
    /// sub-space.
    fn split(&self, other: &H) -> SplitSubHyperplane<H> {
        let tolerance = self.hyperplane.tolerance();

        let Some(trace) = self.hyperplane.trace(other) else {
            // parallel hyperplanes
            let global = other.offset(&self.hyperplane.arbitrary_point());
            return if global < -tolerance {
                SplitSubHyperplane::new(None, Some(self.clone()))
            } else if global > tolerance {
                SplitSubHyperplane::new(Some(self.clone()), None)
            } else {
                SplitSubHyperplane::new(None, None)
            };
        };

        let mut tree = self.remaining.tree(false).clone();
        let root = tree.root();
        let split_root = tree.split(root, trace.whole_hyperplane());
        let split = self.remaining.build_new(tree);
        let Some((plus, minus)) = split.tree(false).children(split_root) else {
            return SplitSubHyperplane::new(Some(self.clone()), None);
        };

        let sub_tolerance = self.remaining.tolerance();
        let plus_region = if split.is_empty_at(plus) {
            Region::empty(sub_tolerance)
        } else {
            Region::from_tree(
                BspTree::from_parts(
                    trace.whole_hyperplane(),
                    split.tree(false).copy_subtree(plus),
                    BspTree::new(Attribute::Inside(false)),
                    Attribute::Absent,
                ),
                sub_tolerance,
            )
        };
        let minus_region = if split.is_empty_at(minus) {
            Region::empty(sub_tolerance)
        } else {
            Region::from_tree(
                BspTree::from_parts(
                    trace.whole_hyperplane(),
                    BspTree::new(Attribute::Inside(false)),
                    split.tree(false).copy_subtree(minus),
                    Attribute::Absent,
                ),
                sub_tolerance,
            )
        };

        SplitSubHyperplane::new(
            Some(Self::new(self.hyperplane.clone(), plus_region)),
            Some(Self::new(self.hyperplane.clone(), minus_region)),
        )
    }

    fn reunite(&self, other: &Self) -> Self {
        Self::new(
            self.hyperplane.clone(),
            RegionFactory.union(self.remaining.clone(), other.remaining.clone()),
        )
    }

    fn transformed<T: Transform<H::Point> + ?Sized>(&self, transform: &T) -> Self {
        let hyperplane = self.hyperplane.transformed(transform);
        // the sub-space map induced by the transform
        let induced = |q: &SubPoint<H>| hyperplane.to_sub_space(&transform.apply(&self.hyperplane.to_space(q)));
        let remaining = self.remaining.transformed(&induced);
        Self::new(hyperplane, remaining)
    }

    fn check_point(&self, point: &H::Point) -> Location {
        self.remaining.check_point(&self.hyperplane.to_sub_space(point))
    }

    fn project_to_boundary(&self, point: &H::Point) -> Option<H::Point> {
        let projection = self.remaining.project_to_boundary(&self.hyperplane.to_sub_space(point));
        projection.projected().map(|p| self.hyperplane.to_space(p))
    }

    fn interior_point(&self) -> Option<H::Point> {
        let default_point = self.hyperplane.to_sub_space(&self.hyperplane.arbitrary_point());
        self.remaining
            .interior_point(&default_point)
            .map(|interior| self.hyperplane.to_space(interior.point()))
    }
}
