//! Dimension-agnostic Binary Space Partitioning kernel.
//!
//! A [`Region`] is a BSP tree whose leaves are flagged inside or outside.
//! Internal nodes carry a cut: the part of a hyperplane that lies inside the
//! node's cell. The kernel provides:
//!
//! - structural tree operations (cell splitting, merging, pruning)
//! - boolean operations through [`RegionFactory`]
//! - boundary characterization, stored on internal nodes as [`BoundaryAttribute`]
//! - point classification, boundary projection and interior point search
//!
//! # Architecture
//!
//! - [`BspTree`]: arena of nodes addressed by [`NodeId`] handles
//! - [`Region`]: a tree plus a tolerance, with cached boundary and properties
//! - [`BspTreeVisitor`]: the single traversal primitive every analysis uses
//! - [`Hyperplane`], [`SubHyperplane`], [`Embedding`]: what a geometry must provide
//! - [`EmbeddedSubHyperplane`]: fragments stored as regions of a lower-dimensional sub-space

mod boundary;
mod embedded;
mod factory;
mod hyperplane;
mod interior;
mod node;
mod projector;
mod region;
mod tree;
mod visitor;

pub use boundary::{BoundaryBuilder, BoundarySizeVisitor, Characterization, build_boundary};
pub use embedded::EmbeddedSubHyperplane;
pub use factory::RegionFactory;
pub use hyperplane::{Embedding, Hyperplane, Point, Side, SplitSubHyperplane, SubHyperplane, Transform};
pub use interior::{InsideCellFinder, InteriorPointFinder, MAX_STAGES, STAGE_FACTOR};
pub use node::{Attribute, BoundaryAttribute, NodeId, NodesSet};
pub use projector::BoundaryProjector;
pub use region::{BoundaryProjection, Location, Properties, Region};
pub use tree::{BspTree, InteriorPoint, LeafMerger, VanishingCutHandler};
pub use visitor::{BspTreeVisitor, NodeCollector, Order};
