//! Errors raised by region construction and analysis.

use crate::bsp::NodeId;

/// All the errors the region kernel can report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// A hyperplane lies entirely outside the convex zone carved by the previous ones.
    #[error("hyperplanes do not bound a convex region")]
    NotConvex,
    /// A convex region was requested from an empty hyperplane list.
    #[error("no hyperplanes given, cannot derive a space or a tolerance")]
    NoHyperplanes,
    /// The interior point search ran out of stages.
    #[error("no point strictly inside the cell found after {stages} stages")]
    InsidePointNotFound { stages: usize },
    /// A tree handed to the validating constructor has inconsistent attributes.
    #[error("malformed region tree at node {node}: {reason}")]
    MalformedTree { node: NodeId, reason: &'static str },
}
