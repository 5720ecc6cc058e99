//! Error types for rig construction and loading.

use thiserror::Error;

use crate::humanoid::HumanoidBone;
use crate::scene::NodeId;

/// Top-level error type for rig operations.
#[derive(Debug, Error)]
pub enum RigError {
    /// A scene document contained no nodes.
    #[error("scene has no root node")]
    EmptyScene,

    /// A node's parent index does not precede it, or the root has a parent.
    #[error("node {node} has invalid parent {parent:?}")]
    InvalidParent {
        /// The offending node.
        node: NodeId,
        /// The parent it declared.
        parent: Option<NodeId>,
    },

    /// A node id does not exist in the scene it was used with.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Two humanoid bones were mapped to the same node.
    #[error("node {node} is already mapped to {existing}, cannot map it to {bone}")]
    DuplicateSkeletonNode {
        /// The bone being inserted.
        bone: HumanoidBone,
        /// The node both bones point at.
        node: NodeId,
        /// The bone already mapped to the node.
        existing: HumanoidBone,
    },

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
