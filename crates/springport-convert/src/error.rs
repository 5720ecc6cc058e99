//! Error and warning types for conversion.

use serde::Serialize;
use springport_rig::{NodeId, RigError};
use thiserror::Error;

/// Warning codes emitted during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W101: Plane collider cannot be expressed as spheres
    PlaneCollider,
    /// W102: Destination has no node for a hand bone
    MissingHandBone,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W101").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::PlaneCollider => "W101",
            WarningCode::MissingHandBone => "W102",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for WarningCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// A non-fatal problem found while converting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// Node the warning is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
}

impl ConversionWarning {
    /// Creates a new warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            node: None,
        }
    }

    /// Creates a new warning about a node.
    pub fn with_node(code: WarningCode, message: impl Into<String>, node: NodeId) -> Self {
        Self {
            code,
            message: message.into(),
            node: Some(node),
        }
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(node) = self.node {
            write!(f, "{}: {} (at {})", self.code, self.message, node)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for conversion.
///
/// Unresolvable references are not errors; they are skipped and counted in
/// the report. These variants abort the whole conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An avatar has no hips bone, so it is not a humanoid rig.
    #[error("{avatar} avatar has no humanoid hips bone")]
    NotHumanoid {
        /// "source" or "destination".
        avatar: &'static str,
    },

    /// Ancestor search found no registered skeleton bone above a node that
    /// was already known to be under the hips.
    #[error("node {node} has no ancestor registered as a humanoid skeleton bone")]
    NoSkeletonAncestor {
        /// The node whose ancestry was searched.
        node: NodeId,
    },

    /// Rig error.
    #[error(transparent)]
    Rig(#[from] RigError),

    /// The persistence collaborator failed.
    #[error("failed to persist converted avatar: {0}")]
    Persist(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
