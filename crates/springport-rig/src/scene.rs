//! In-memory scene graph.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::graph::SceneGraph;
use crate::spring::{SpringBone, SpringBoneColliderGroup};

/// Index of a node within a [`Scene`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the node's position in the scene's node list.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position, rotation, and scale relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    /// Translation from the parent's origin.
    #[serde(default)]
    pub position: Vec3,
    /// Rotation relative to the parent.
    #[serde(default = "default_rotation")]
    pub rotation: Quat,
    /// Scale relative to the parent.
    #[serde(default = "default_scale")]
    pub scale: Vec3,
}

fn default_rotation() -> Quat {
    Quat::IDENTITY
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl LocalTransform {
    /// Creates a transform from its parts.
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Creates an unrotated, unscaled transform at `position`.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Builder method to set a uniform scale.
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Builder method to set the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Kinds of destination components a node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// [`SpringBone`] components.
    SpringBone,
    /// The node's [`SpringBoneColliderGroup`].
    ColliderGroup,
}

/// A node in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node name, used for path lookups.
    pub name: String,
    /// Parent node; `None` only for the scene root.
    pub(crate) parent: Option<NodeId>,
    #[serde(skip)]
    pub(crate) children: Vec<NodeId>,
    /// Transform relative to the parent.
    #[serde(default)]
    pub transform: LocalTransform,
    /// Collider group attached to this node, at most one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collider_group: Option<SpringBoneColliderGroup>,
    /// Spring bones hosted by this node.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spring_bones: Vec<SpringBone>,
}

impl Node {
    fn new(name: impl Into<String>, parent: Option<NodeId>, transform: LocalTransform) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            transform,
            collider_group: None,
            spring_bones: Vec::new(),
        }
    }

    /// Returns the parent node.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child nodes in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An arena-backed tree of nodes.
///
/// Node 0 is the root. Nodes are only ever appended, so a parent always
/// precedes its children in the node list; the serialized form relies on
/// this and rebuilds child lists on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SceneRecord", into = "SceneRecord")]
pub struct Scene {
    nodes: Vec<Node>,
}

#[derive(Serialize, Deserialize)]
struct SceneRecord {
    nodes: Vec<Node>,
}

impl TryFrom<SceneRecord> for Scene {
    type Error = RigError;

    fn try_from(record: SceneRecord) -> Result<Self, Self::Error> {
        let mut nodes = record.nodes;
        if nodes.is_empty() {
            return Err(RigError::EmptyScene);
        }
        for index in 0..nodes.len() {
            let node = NodeId(index as u32);
            let parent = nodes[index].parent;
            match parent {
                None if index == 0 => {}
                Some(p) if index > 0 && p.index() < index => {
                    nodes[p.index()].children.push(node);
                }
                _ => return Err(RigError::InvalidParent { node, parent }),
            }
        }
        Ok(Self { nodes })
    }
}

impl From<Scene> for SceneRecord {
    fn from(scene: Scene) -> Self {
        Self { nodes: scene.nodes }
    }
}

impl Scene {
    /// Creates a scene containing only a root node.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::new(root_name, None, LocalTransform::default())],
        }
    }

    /// Parses a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the scene holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Returns true if `id` names a node of this scene.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Returns an error unless `id` names a node of this scene.
    pub fn check(&self, id: NodeId) -> Result<NodeId, RigError> {
        if self.contains(id) {
            Ok(id)
        } else {
            Err(RigError::UnknownNode(id))
        }
    }

    /// Returns a node.
    ///
    /// # Panics
    /// Panics if `id` is not part of this scene.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns a node mutably.
    ///
    /// # Panics
    /// Panics if `id` is not part of this scene.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Iterates over all node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Appends a child node under `parent` and returns its id.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: LocalTransform,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(name, Some(parent), transform));
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Returns the first child of `parent` named `name`, creating it if absent.
    ///
    /// The flag is true when the node was created.
    pub fn find_or_create_child(&mut self, parent: NodeId, name: &str) -> (NodeId, bool) {
        let existing = self
            .children(parent)
            .iter()
            .copied()
            .find(|&child| self.name(child) == name);
        match existing {
            Some(child) => (child, false),
            None => (self.add_child(parent, name, LocalTransform::default()), true),
        }
    }

    /// Returns the collider group on `id`, if any.
    pub fn collider_group(&self, id: NodeId) -> Option<&SpringBoneColliderGroup> {
        self.node(id).collider_group.as_ref()
    }

    /// Returns the collider group on `id` mutably, if any.
    pub fn collider_group_mut(&mut self, id: NodeId) -> Option<&mut SpringBoneColliderGroup> {
        self.node_mut(id).collider_group.as_mut()
    }

    /// Attaches a collider group to `id`, replacing any existing one.
    pub fn set_collider_group(&mut self, id: NodeId, group: SpringBoneColliderGroup) {
        self.node_mut(id).collider_group = Some(group);
    }

    /// Returns the spring bones hosted by `id`.
    pub fn spring_bones(&self, id: NodeId) -> &[SpringBone] {
        &self.node(id).spring_bones
    }

    /// Adds a spring bone to `id`.
    pub fn add_spring_bone(&mut self, id: NodeId, spring_bone: SpringBone) {
        self.node_mut(id).spring_bones.push(spring_bone);
    }

    /// Removes every component of `kind` from `id` and returns how many were
    /// removed.
    pub fn remove_components(&mut self, id: NodeId, kind: ComponentKind) -> usize {
        let node = self.node_mut(id);
        match kind {
            ComponentKind::SpringBone => std::mem::take(&mut node.spring_bones).len(),
            ComponentKind::ColliderGroup => usize::from(node.collider_group.take().is_some()),
        }
    }

    /// Serializes the scene to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SceneGraph for Scene {
    fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    fn local_transform(&self, id: NodeId) -> &LocalTransform {
        &self.node(id).transform
    }
}
