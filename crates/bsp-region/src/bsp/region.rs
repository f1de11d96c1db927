//! Regions of space represented by BSP trees.

use std::cell::OnceCell;

use crate::error::RegionError;

use super::boundary::{BoundarySizeVisitor, build_boundary};
use super::factory::RegionFactory;
use super::hyperplane::{Hyperplane, SubHyperplane, Transform};
use super::interior::InteriorPointFinder;
use super::node::{Attribute, BoundaryAttribute, NodeId, NodesSet};
use super::projector::BoundaryProjector;
use super::tree::{BspTree, InteriorPoint, NodeMapper};
use super::visitor::{NodeCollector, Order};

/// Location of a point with respect to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Inside,
    Outside,
    Boundary,
}

/// Size and barycenter of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct Properties<P> {
    size: f64,
    barycenter: Option<P>,
}

impl<P> Properties<P> {
    /// Creates properties; the barycenter is `None` for unbounded or empty
    /// regions.
    pub fn new(size: f64, barycenter: Option<P>) -> Self {
        Self { size, barycenter }
    }

    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    #[inline]
    pub fn barycenter(&self) -> Option<&P> {
        self.barycenter.as_ref()
    }
}

/// Projection of a point on the boundary of a region.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryProjection<P> {
    original: P,
    projected: Option<P>,
    offset: f64,
}

impl<P> BoundaryProjection<P> {
    pub fn new(original: P, projected: Option<P>, offset: f64) -> Self {
        Self {
            original,
            projected,
            offset,
        }
    }

    /// The projected point.
    pub fn original(&self) -> &P {
        &self.original
    }

    /// Closest boundary point, `None` if the region has no boundary.
    pub fn projected(&self) -> Option<&P> {
        self.projected.as_ref()
    }

    /// Signed distance to the boundary: negative inside, positive outside.
    ///
    /// A region without boundary gives `-inf` if it covers the whole space
    /// and `+inf` if it is empty.
    pub fn offset(&self) -> f64 {
        self.offset
    }
}

/// A region of space: the union of the inside leaf cells of a BSP tree.
///
/// Leaves of the tree carry [`Attribute::Inside`]. The boundary attributes
/// of internal nodes are computed lazily, the first time they are needed,
/// and cached together with size and barycenter. All queries take `&self`.
///
/// # Trees built by hand
///
/// [`Region::from_tree`] trusts its argument: every leaf must carry an
/// inside/outside flag. Queries reaching a leaf without one panic. Use
/// [`Region::try_from_tree`] to validate the tree up front.
#[derive(Debug, Clone)]
pub struct Region<H: Hyperplane> {
    tree: BspTree<H>,
    tolerance: f64,
    boundary: OnceCell<BspTree<H>>,
    properties: OnceCell<Properties<H::Point>>,
}

impl<H: Hyperplane> Region<H> {
    /// Region covering the whole space.
    pub fn whole_space(tolerance: f64) -> Self {
        Self::from_tree(BspTree::new(Attribute::Inside(true)), tolerance)
    }

    /// Region covering nothing.
    pub fn empty(tolerance: f64) -> Self {
        Self::from_tree(BspTree::new(Attribute::Inside(false)), tolerance)
    }

    /// Wraps a tree without checking it.
    ///
    /// Every leaf must carry [`Attribute::Inside`]. Internal nodes carry
    /// either [`Attribute::Absent`], or boundary attributes consistent with
    /// the leaves.
    pub fn from_tree(tree: BspTree<H>, tolerance: f64) -> Self {
        Self {
            tree,
            tolerance,
            boundary: OnceCell::new(),
            properties: OnceCell::new(),
        }
    }

    /// Wraps a tree after checking that every leaf carries an
    /// inside/outside flag and no internal node carries one.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MalformedTree`] naming the first offending node.
    pub fn try_from_tree(tree: BspTree<H>, tolerance: f64) -> Result<Self, RegionError> {
        let mut collector = NodeCollector::new(Order::PlusMinusSub);
        tree.visit(&mut collector);
        let (internal, leaves) = collector.into_nodes();
        if let Some(&node) = leaves.iter().find(|&&n| tree.attribute(n).flag().is_none()) {
            return Err(RegionError::MalformedTree {
                node,
                reason: "leaf without inside/outside flag",
            });
        }
        if let Some(&node) = internal.iter().find(|&&n| tree.attribute(n).flag().is_some()) {
            return Err(RegionError::MalformedTree {
                node,
                reason: "internal node with an inside/outside flag",
            });
        }
        Ok(Self::from_tree(tree, tolerance))
    }

    /// Builds a region from its boundary.
    ///
    /// The fragments must be oriented with the inside on their minus side.
    /// They are inserted top-down by decreasing size; each inserted
    /// hyperplane splits the remaining fragments between its two subtrees.
    /// Leaves reached through a minus branch are inside, the others outside.
    /// An empty boundary gives the whole space.
    pub fn from_boundary<I: IntoIterator<Item = H::Sub>>(boundary: I, tolerance: f64) -> Self {
        let mut fragments: Vec<H::Sub> = boundary.into_iter().collect();
        if fragments.is_empty() {
            return Self::whole_space(tolerance);
        }

        // stable: equal sizes keep their input order
        fragments.sort_by(|a, b| b.size().total_cmp(&a.size()));

        let mut tree = BspTree::new(Attribute::Absent);
        let root = tree.root();
        insert_cuts(&mut tree, root, fragments);

        let mut collector = NodeCollector::new(Order::PlusSubMinus);
        tree.visit(&mut collector);
        for &leaf in collector.leaf_nodes() {
            let inside = match tree.parent(leaf) {
                None => true,
                Some(parent) => tree.minus(parent) == Some(leaf),
            };
            tree.set_attribute(leaf, Attribute::Inside(inside));
        }

        Self::from_tree(tree, tolerance)
    }

    /// Builds the convex region on the minus side of all hyperplanes.
    ///
    /// A hyperplane parallel to one already used is dropped if it has the
    /// same orientation; with the opposite orientation the region is thinner
    /// than the tolerance and is considered empty. An empty list gives the
    /// empty region.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::NotConvex`] if a hyperplane lies entirely
    /// outside the zone carved by the previous ones.
    pub fn from_hyperplanes(hyperplanes: &[H], tolerance: f64) -> Result<Self, RegionError> {
        if hyperplanes.is_empty() {
            return Ok(Self::empty(tolerance));
        }

        let mut tree = BspTree::new(Attribute::Inside(true));
        let mut node = tree.root();
        for hyperplane in hyperplanes {
            if tree.insert_cut(node, hyperplane) {
                let (plus, minus) = tree.children(node).ok_or(RegionError::NotConvex)?;
                tree.set_attribute(node, Attribute::Absent);
                tree.set_attribute(plus, Attribute::Inside(false));
                tree.set_attribute(minus, Attribute::Inside(true));
                node = minus;
                continue;
            }

            // the hyperplane does not cross the current cell: either it is
            // parallel to a previous one, or the input is not convex
            let mut remaining = Some(hyperplane.whole_hyperplane());
            let mut current = node;
            while let (Some(s), Some(parent)) = (remaining.take(), tree.parent(current)) {
                let Some(other) = tree.hyperplane(parent) else {
                    break;
                };
                let split = s.split(other);
                remaining = match split.side() {
                    super::Side::Hyper => {
                        if !hyperplane.same_orientation_as(other) {
                            log::debug!("opposite parallel hyperplanes, convex region is empty");
                            return Ok(Self::empty(tolerance));
                        }
                        log::debug!("dropping hyperplane parallel to the cut of node {parent}");
                        Some(s)
                    }
                    super::Side::Plus => return Err(RegionError::NotConvex),
                    super::Side::Minus | super::Side::Both => split.into_parts().1,
                };
                current = parent;
            }
        }

        Ok(Self::from_tree(tree, tolerance))
    }

    /// Builds a region of the same kind and tolerance from another tree.
    pub fn build_new(&self, tree: BspTree<H>) -> Self {
        Self::from_tree(tree, self.tolerance)
    }

    /// Tolerance below which points are considered on the boundary.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// The tree representing the region.
    ///
    /// With `include_boundary`, every internal node carries a
    /// [`BoundaryAttribute`]; they are computed on first request and cached.
    /// Both trees share the same node handles.
    ///
    /// # Panics
    ///
    /// Computing the boundary panics if a leaf carries no inside/outside
    /// flag.
    pub fn tree(&self, include_boundary: bool) -> &BspTree<H> {
        let root = self.tree.root();
        if !include_boundary || self.tree.is_leaf(root) || self.tree.attribute(root).boundary().is_some() {
            return &self.tree;
        }
        self.boundary.get_or_init(|| {
            let mut tree = self.tree.clone();
            build_boundary(&mut tree);
            tree
        })
    }

    /// Tree carrying the boundary attributes if they were already computed.
    fn annotated_tree(&self) -> &BspTree<H> {
        self.boundary.get().unwrap_or(&self.tree)
    }

    /// Consumes the region, returning its tree (with boundary attributes if
    /// they were computed).
    pub fn into_tree(self) -> BspTree<H> {
        self.boundary.into_inner().unwrap_or(self.tree)
    }

    fn leaf_flag(&self, node: NodeId) -> bool {
        self.tree
            .attribute(node)
            .flag()
            .unwrap_or_else(|| panic!("leaf {node} carries no inside/outside flag"))
    }

    /// Checks if the region is empty.
    ///
    /// # Panics
    ///
    /// Panics if a visited leaf carries no inside/outside flag.
    pub fn is_empty(&self) -> bool {
        self.is_empty_at(self.tree.root())
    }

    /// Checks if the subtree rooted at a node contains no inside cell.
    ///
    /// Stops at the first inside leaf found.
    pub fn is_empty_at(&self, node: NodeId) -> bool {
        match self.tree.children(node) {
            None => !self.leaf_flag(node),
            Some((plus, minus)) => self.is_empty_at(minus) && self.is_empty_at(plus),
        }
    }

    /// Checks if the region covers the whole space.
    pub fn is_full(&self) -> bool {
        self.is_full_at(self.tree.root())
    }

    /// Checks if the subtree rooted at a node contains no outside cell.
    pub fn is_full_at(&self, node: NodeId) -> bool {
        match self.tree.children(node) {
            None => self.leaf_flag(node),
            Some((plus, minus)) => self.is_full_at(minus) && self.is_full_at(plus),
        }
    }

    /// Checks if this region contains another one.
    pub fn contains(&self, other: &Region<H>) -> bool {
        RegionFactory.difference(other.clone(), self.clone()).is_empty()
    }

    /// Classifies a point.
    ///
    /// A point within tolerance of a cut is classified on both sides of
    /// that cut; it is on the boundary if the two sides disagree.
    pub fn check_point(&self, point: &H::Point) -> Location {
        self.check_point_at(self.tree.root(), point)
    }

    fn check_point_at(&self, node: NodeId, point: &H::Point) -> Location {
        let cell = self.tree.cell(node, point, self.tolerance);
        match self.tree.children(cell) {
            None => {
                if self.leaf_flag(cell) {
                    Location::Inside
                } else {
                    Location::Outside
                }
            }
            Some((plus, minus)) => {
                let minus_location = self.check_point_at(minus, point);
                let plus_location = self.check_point_at(plus, point);
                if minus_location == plus_location {
                    minus_location
                } else {
                    Location::Boundary
                }
            }
        }
    }

    /// Projects a point on the region boundary.
    pub fn project_to_boundary(&self, point: &H::Point) -> BoundaryProjection<H::Point> {
        let mut projector = BoundaryProjector::new(point.clone());
        self.tree(true).visit(&mut projector);
        projector.projection()
    }

    /// Total size of the boundary (perimeter in 2-D, surface area in 3-D).
    pub fn boundary_size(&self) -> f64 {
        let mut visitor = BoundarySizeVisitor::new();
        self.tree(true).visit(&mut visitor);
        visitor.size()
    }

    /// Size and barycenter, computed on first request.
    pub fn properties(&self) -> &Properties<H::Point> {
        self.properties.get_or_init(|| H::geometrical_properties(self))
    }

    /// Size of the region (length, area, volume); infinite if unbounded.
    pub fn size(&self) -> f64 {
        self.properties().size()
    }

    /// Barycenter of the region, `None` if unbounded or empty.
    pub fn barycenter(&self) -> Option<&H::Point> {
        self.properties().barycenter()
    }

    /// Part of a sub-hyperplane lying inside the region, if any.
    pub fn intersection(&self, sub: &H::Sub) -> Option<H::Sub> {
        self.recurse_intersection(self.tree.root(), sub.clone())
    }

    fn recurse_intersection(&self, node: NodeId, sub: H::Sub) -> Option<H::Sub> {
        let Some((plus, minus)) = self.tree.children(node) else {
            return self.leaf_flag(node).then_some(sub);
        };
        let hyperplane = self.tree.hyperplane(node)?;
        match sub.split(hyperplane).into_parts() {
            (Some(sub_plus), Some(sub_minus)) => {
                let plus = self.recurse_intersection(plus, sub_plus);
                let minus = self.recurse_intersection(minus, sub_minus);
                match (plus, minus) {
                    (Some(p), Some(m)) => Some(p.reunite(&m)),
                    (p, m) => p.or(m),
                }
            }
            (Some(_), None) => self.recurse_intersection(plus, sub),
            (None, Some(_)) => self.recurse_intersection(minus, sub),
            (None, None) => {
                let on_minus = self.recurse_intersection(minus, sub)?;
                self.recurse_intersection(plus, on_minus)
            }
        }
    }

    /// Image of the region under an affine map.
    ///
    /// Cuts and boundary fragments are mapped; cached boundary attributes
    /// are carried over with their splitters remapped to the new nodes.
    pub fn transformed<T: Transform<H::Point> + ?Sized>(&self, transform: &T) -> Self {
        let source = self.annotated_tree();
        let tree = source.rebuild(source.root(), &mut Transformer { transform });
        self.build_new(tree)
    }

    /// The most robust interior point of the region: the one farthest from
    /// the walls of its cell. `None` if the region is empty.
    pub fn interior_point(&self, default_point: &H::Point) -> Option<InteriorPoint<H::Point>> {
        let mut finder = InteriorPointFinder::new(default_point.clone());
        self.tree.visit(&mut finder);
        finder.into_best()
    }
}

/// Inserts a B-rep fragment list into the subtree rooted at `node`.
fn insert_cuts<H: Hyperplane>(tree: &mut BspTree<H>, node: NodeId, fragments: Vec<H::Sub>) {
    let mut iter = fragments.into_iter();

    // build the current level
    let mut inserted = None;
    for fragment in iter.by_ref() {
        let hyperplane = fragment.hyperplane().clone();
        if tree.insert_cut(node, &hyperplane) {
            inserted = Some(hyperplane);
            break;
        }
    }
    let (Some(inserted), Some((plus, minus))) = (inserted, tree.children(node)) else {
        return;
    };

    // distribute the remaining fragments in the two subtrees
    let mut plus_list = Vec::new();
    let mut minus_list = Vec::new();
    for other in iter {
        match other.split(&inserted).into_parts() {
            (Some(p), Some(m)) => {
                plus_list.push(p);
                minus_list.push(m);
            }
            (Some(_), None) => plus_list.push(other),
            (None, Some(_)) => minus_list.push(other),
            // fragments on the inserted hyperplane are already accounted for
            (None, None) => {}
        }
    }

    insert_cuts(tree, plus, plus_list);
    insert_cuts(tree, minus, minus_list);
}

struct Transformer<'t, T: ?Sized> {
    transform: &'t T,
}

impl<H, T> NodeMapper<H> for Transformer<'_, T>
where
    H: Hyperplane,
    T: Transform<H::Point> + ?Sized,
{
    fn map_cut(&mut self, sub: &H::Sub) -> H::Sub {
        sub.transformed(self.transform)
    }

    fn map_leaf(&mut self, attribute: &Attribute<H>) -> Attribute<H> {
        attribute.clone()
    }

    fn map_boundary(&mut self, boundary: &BoundaryAttribute<H>) -> BoundaryAttribute<H> {
        BoundaryAttribute::new(
            boundary.plus_outside().map(|s| s.transformed(self.transform)),
            boundary.plus_inside().map(|s| s.transformed(self.transform)),
            NodesSet::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::euclidean::{Line, OrientedPoint, Plane, cuboid, interval, polygon};
    use approx::assert_relative_eq;
    use nalgebra::{Point1, Point2, Point3, Vector2};

    const TOL: f64 = 1.0e-10;

    fn make_square(min: f64, max: f64) -> Region<Line> {
        polygon(
            &[
                Point2::new(min, min),
                Point2::new(max, min),
                Point2::new(max, max),
                Point2::new(min, max),
            ],
            TOL,
        )
    }

    #[test]
    fn whole_space_and_empty() {
        let full: Region<Line> = Region::whole_space(TOL);
        assert!(full.is_full());
        assert!(!full.is_empty());
        assert_eq!(full.check_point(&Point2::new(1.0e6, -3.0)), Location::Inside);

        let empty: Region<Line> = Region::empty(TOL);
        assert!(empty.is_empty());
        assert_eq!(empty.check_point(&Point2::origin()), Location::Outside);
    }

    #[test]
    fn check_point_on_interval() {
        let region = interval(1.0, 3.0, TOL);
        assert_eq!(region.check_point(&Point1::new(2.0)), Location::Inside);
        assert_eq!(region.check_point(&Point1::new(0.0)), Location::Outside);
        assert_eq!(region.check_point(&Point1::new(1.0)), Location::Boundary);
        assert_eq!(region.check_point(&Point1::new(3.0 + 0.5 * TOL)), Location::Boundary);
        assert_eq!(region.check_point(&Point1::new(5.0)), Location::Outside);
    }

    #[test]
    fn check_point_on_square() {
        let square = make_square(0.0, 1.0);
        assert_eq!(square.check_point(&Point2::new(0.5, 0.5)), Location::Inside);
        assert_eq!(square.check_point(&Point2::new(0.5, 0.0)), Location::Boundary);
        assert_eq!(square.check_point(&Point2::new(1.0, 1.0)), Location::Boundary);
        assert_eq!(square.check_point(&Point2::new(1.5, 0.5)), Location::Outside);
        // on the extension of an edge, outside the square
        assert_eq!(square.check_point(&Point2::new(2.0, 0.0)), Location::Outside);
    }

    #[test]
    fn from_empty_boundary_is_whole_space() {
        let region: Region<Line> = Region::from_boundary(Vec::new(), TOL);
        assert!(region.is_full());
    }

    #[test]
    fn from_hyperplanes_builds_convex_cell() {
        let hyperplanes = [
            OrientedPoint::new(0.0, false, TOL),
            OrientedPoint::new(2.0, true, TOL),
            // redundant
            OrientedPoint::new(2.0, true, TOL),
        ];
        let region = Region::from_hyperplanes(&hyperplanes, TOL).unwrap();
        assert_eq!(region.check_point(&Point1::new(1.0)), Location::Inside);
        assert_eq!(region.check_point(&Point1::new(3.0)), Location::Outside);
        assert_relative_eq!(region.size(), 2.0);

        let opposite = [OrientedPoint::new(1.0, true, TOL), OrientedPoint::new(1.0, false, TOL)];
        assert!(Region::from_hyperplanes(&opposite, TOL).unwrap().is_empty());

        let none: [OrientedPoint; 0] = [];
        assert!(Region::from_hyperplanes(&none, TOL).unwrap().is_empty());
    }

    #[test]
    fn from_hyperplanes_rejects_inconsistent_input() {
        // x < 0 then x > 1 cannot bound a single cell
        let hyperplanes = [OrientedPoint::new(0.0, true, TOL), OrientedPoint::new(1.0, false, TOL)];
        assert!(matches!(
            Region::from_hyperplanes(&hyperplanes, TOL),
            Err(RegionError::NotConvex)
        ));
    }

    #[test]
    fn try_from_tree_reports_malformed_leaves() {
        let mut tree: BspTree<OrientedPoint> = BspTree::new(Attribute::Absent);
        let root = tree.root();
        assert!(tree.insert_cut(root, &OrientedPoint::new(0.0, true, TOL)));
        let plus = tree.plus(root).unwrap();
        tree.set_attribute(plus, Attribute::Inside(true));

        let err = Region::try_from_tree(tree.clone(), TOL).unwrap_err();
        assert!(matches!(err, RegionError::MalformedTree { node, .. } if node == tree.minus(root).unwrap()));

        tree.set_attribute(tree.minus(root).unwrap(), Attribute::Inside(false));
        let region = Region::try_from_tree(tree, TOL).unwrap();
        assert_eq!(region.check_point(&Point1::new(1.0)), Location::Inside);
    }

    #[test]
    #[should_panic(expected = "carries no inside/outside flag")]
    fn unchecked_malformed_tree_fails_late() {
        let mut tree: BspTree<OrientedPoint> = BspTree::new(Attribute::Absent);
        let root = tree.root();
        assert!(tree.insert_cut(root, &OrientedPoint::new(0.0, true, TOL)));
        // accepted without checks
        let region = Region::from_tree(tree, TOL);
        region.check_point(&Point1::new(1.0));
    }

    #[test]
    fn boundary_tree_is_cached() {
        let square = make_square(0.0, 2.0);
        let first = square.tree(true) as *const BspTree<Line>;
        let size = square.boundary_size();
        let second = square.tree(true) as *const BspTree<Line>;
        assert_eq!(first, second);
        assert_relative_eq!(size, 8.0, epsilon = 1.0e-12);
        assert_relative_eq!(square.boundary_size(), size);

        // the raw tree is left untouched
        let raw = square.tree(false);
        assert!(raw.attribute(raw.root()).boundary().is_none());
        assert!(square.tree(true).attribute(raw.root()).boundary().is_some());
    }

    #[test]
    fn size_and_barycenter_of_square() {
        let square = make_square(1.0, 3.0);
        assert_relative_eq!(square.size(), 4.0, epsilon = 1.0e-12);
        let barycenter = square.barycenter().unwrap();
        assert_relative_eq!(barycenter.x, 2.0, epsilon = 1.0e-12);
        assert_relative_eq!(barycenter.y, 2.0, epsilon = 1.0e-12);
    }

    #[test]
    fn intersection_clips_line() {
        let square = make_square(0.0, 1.0);
        let line = Line::from_points(Point2::new(-1.0, 0.25), Point2::new(2.0, 0.25), TOL);
        let inside = square.intersection(&line.whole_hyperplane()).unwrap();
        assert_relative_eq!(inside.size(), 1.0, epsilon = 1.0e-12);

        let away = Line::from_points(Point2::new(-1.0, 5.0), Point2::new(2.0, 5.0), TOL);
        assert!(square.intersection(&away.whole_hyperplane()).is_none());
    }

    #[test]
    fn transformed_square() {
        let square = make_square(0.0, 1.0);
        // compute the boundary first, so it gets carried over
        let perimeter = square.boundary_size();
        let shift = Vector2::new(10.0, -4.0);
        let moved = square.transformed(&|p: &Point2<f64>| p + shift);

        assert_eq!(moved.check_point(&Point2::new(10.5, -3.5)), Location::Inside);
        assert_eq!(moved.check_point(&Point2::new(0.5, 0.5)), Location::Outside);
        assert_relative_eq!(moved.boundary_size(), perimeter, epsilon = 1.0e-12);
        assert_relative_eq!(moved.size(), 1.0, epsilon = 1.0e-12);
        let barycenter = moved.barycenter().unwrap();
        assert_relative_eq!(barycenter.x, 10.5, epsilon = 1.0e-12);
        assert_relative_eq!(barycenter.y, -3.5, epsilon = 1.0e-12);
    }

    #[test]
    fn contains_smaller_square() {
        let big = make_square(0.0, 4.0);
        let small = make_square(1.0, 2.0);
        assert!(big.contains(&small));
        assert!(!small.contains(&big));
    }

    #[test]
    fn interior_point_is_inside() {
        let cube = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0), TOL).unwrap();
        let interior = cube.interior_point(&Point3::origin()).unwrap();
        assert_eq!(cube.check_point(interior.point()), Location::Inside);
        assert!(interior.distance() > TOL);

        let empty: Region<Plane> = Region::empty(TOL);
        assert!(empty.interior_point(&Point3::origin()).is_none());
    }

    #[test]
    fn interior_point_of_slab_few_tolerances_thick() {
        for thickness in [5.0 * TOL, 20.0 * TOL, 100.0 * TOL] {
            // minus sides: y > 0, y < thickness, x > 0, x < 1
            let slab = RegionFactory
                .build_convex(&[
                    Line::from_points(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), TOL),
                    Line::from_points(Point2::new(1.0, thickness), Point2::new(0.0, thickness), TOL),
                    Line::from_points(Point2::new(0.0, thickness), Point2::new(0.0, 0.0), TOL),
                    Line::from_points(Point2::new(1.0, 0.0), Point2::new(1.0, thickness), TOL),
                ])
                .unwrap();
            assert!(!slab.is_empty());

            let interior = slab.interior_point(&Point2::origin()).unwrap();
            assert_eq!(slab.check_point(interior.point()), Location::Inside, "thickness {thickness}");
            let y = interior.point().y;
            assert!(y > TOL && y < thickness - TOL);
        }
    }

    #[test]
    fn projection_on_interval() {
        let region = interval(1.0, 3.0, TOL);
        let inside = region.project_to_boundary(&Point1::new(1.5));
        assert_relative_eq!(inside.offset(), -0.5, epsilon = 1.0e-12);
        assert_relative_eq!(inside.projected().unwrap().x, 1.0, epsilon = 1.0e-12);

        let outside = region.project_to_boundary(&Point1::new(4.0));
        assert_relative_eq!(outside.offset(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(outside.projected().unwrap().x, 3.0, epsilon = 1.0e-12);
    }
}
