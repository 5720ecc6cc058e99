//! Destination spring-bone components.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Radius of the sphere a freshly created collider group starts with.
pub const DEFAULT_SPHERE_RADIUS: f32 = 0.1;

/// A sphere in the local space of the node owning its group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereCollider {
    /// Center offset from the node origin.
    pub offset: Vec3,
    /// Sphere radius.
    pub radius: f32,
}

impl SphereCollider {
    /// Creates a sphere collider.
    pub fn new(offset: Vec3, radius: f32) -> Self {
        Self { offset, radius }
    }
}

/// Sphere colliders attached to one node.
///
/// A node owns at most one group, so groups are identified by their node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpringBoneColliderGroup {
    /// The group's spheres.
    #[serde(default)]
    pub colliders: Vec<SphereCollider>,
}

impl SpringBoneColliderGroup {
    /// Creates a group holding `colliders`.
    pub fn new(colliders: Vec<SphereCollider>) -> Self {
        Self { colliders }
    }

    /// Creates a group the way a freshly added component starts: one sphere
    /// at the origin of [`DEFAULT_SPHERE_RADIUS`].
    pub fn with_default_collider() -> Self {
        Self::new(vec![SphereCollider::new(Vec3::ZERO, DEFAULT_SPHERE_RADIUS)])
    }
}

/// A spring-bone chain set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringBone {
    /// Display comment, usually the chain's tag or root name.
    #[serde(default)]
    pub comment: String,
    pub stiffness_force: f32,
    pub gravity_power: f32,
    pub gravity_dir: Vec3,
    pub drag_force: f32,
    /// Roots of the simulated chains.
    pub root_bones: Vec<NodeId>,
    /// Collision radius of each simulated joint.
    pub hit_radius: f32,
    /// Nodes whose collider groups this spring bone collides with.
    #[serde(default)]
    pub collider_groups: Vec<NodeId>,
}

impl Default for SpringBone {
    fn default() -> Self {
        Self {
            comment: String::new(),
            stiffness_force: 1.0,
            gravity_power: 0.0,
            gravity_dir: Vec3::NEG_Y,
            drag_force: 0.4,
            root_bones: Vec::new(),
            hit_radius: 0.02,
            collider_groups: Vec::new(),
        }
    }
}
