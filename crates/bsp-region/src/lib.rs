//! Regions of space represented as Binary Space Partitioning (BSP) trees.
//!
//! The [`bsp`] module holds a dimension-agnostic kernel: trees whose leaves
//! are flagged inside or outside, boolean operations between regions,
//! boundary extraction, point classification and projection, and interior
//! point discovery. It only talks to geometry through the capability traits
//! of [`bsp::Hyperplane`] and friends.
//!
//! The [`euclidean`] module provides the 1D, 2D and 3D Euclidean spaces.
//!
//! # Example
//!
//! ```
//! use bsp_region::bsp::{Location, RegionFactory};
//! use bsp_region::euclidean::{DEFAULT_TOLERANCE, cuboid};
//! use nalgebra::Point3;
//!
//! let cube = cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 3.0, 3.0), DEFAULT_TOLERANCE)?;
//! let hole = cuboid(Point3::new(1.0, 1.0, -1.0), Point3::new(2.0, 2.0, 4.0), DEFAULT_TOLERANCE)?;
//! let drilled = RegionFactory.difference(cube, hole);
//!
//! assert!((drilled.size() - 24.0).abs() < 1.0e-9);
//! assert_eq!(drilled.check_point(&Point3::new(1.5, 1.5, 1.5)), Location::Outside);
//! # Ok::<(), bsp_region::RegionError>(())
//! ```

pub mod bsp;
pub mod euclidean;
mod error;

pub use error::RegionError;
