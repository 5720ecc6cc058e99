//! Collaborators notified of conversion side effects.
//!
//! A live scene instance wants every structural change recorded (for undo),
//! and every conversion ends by handing the destination to persistence.
//! Both are injected; the defaults do nothing.

use serde::Serialize;
use springport_rig::{Avatar, NodeId};

use crate::error::ConvertError;

/// A structural change to the destination scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// A node was created.
    AddNode,
    /// A collider group was attached.
    AddColliderGroup,
    /// An existing collider group gained spheres.
    ModifyColliderGroup,
    /// A collider group was removed.
    RemoveColliderGroup,
    /// A spring bone was attached.
    AddSpringBone,
    /// All spring bones on the node were removed.
    RemoveSpringBones,
}

/// Receives structural changes made to an instance avatar.
pub trait MutationObserver {
    /// Called once per change, after it is applied.
    fn record(&mut self, node: NodeId, mutation: Mutation);
}

/// Observer that ignores every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MutationObserver for NoopObserver {
    fn record(&mut self, _node: NodeId, _mutation: Mutation) {}
}

/// Observer that keeps every change in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationLog {
    pub entries: Vec<(NodeId, Mutation)>,
}

impl MutationLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts entries of one kind.
    pub fn count(&self, mutation: Mutation) -> usize {
        self.entries.iter().filter(|(_, m)| *m == mutation).count()
    }
}

impl MutationObserver for MutationLog {
    fn record(&mut self, node: NodeId, mutation: Mutation) {
        self.entries.push((node, mutation));
    }
}

/// Persists the converted destination avatar.
pub trait AssetSink {
    /// Saves the avatar. Called once, after all stages succeeded.
    fn save(&mut self, avatar: &Avatar) -> Result<(), ConvertError>;
}

/// Sink that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AssetSink for NullSink {
    fn save(&mut self, _avatar: &Avatar) -> Result<(), ConvertError> {
        Ok(())
    }
}
