use thiserror::Error;

use crate::noise::generator::NodeId;

/// Errors reported by the generator arena and the planet mesh builders.
#[derive(Debug, Error)]
pub enum PlanetError {
    /// The id was never issued by this tree, or its node has been destroyed.
    #[error("node {0} is not live in this generator tree")]
    StaleNode(NodeId),

    /// A Constant-only accessor was called on another variant.
    #[error("node {node} is a {kind} node, not a constant")]
    NotConstant { node: NodeId, kind: &'static str },

    #[error("grid size {0} is too small, need at least 2 vertices per side")]
    GridTooSmall(usize),

    #[error("grid size {0} overflows the addressable vertex count")]
    GridTooLarge(usize),

    #[error("tile size {0} must be odd and at least 3 for edge stitching")]
    InvalidTileSize(usize),

    #[error("vertex buffer holds {got} floats, {needed} required")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("invalid planet config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
