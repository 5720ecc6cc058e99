//! springport rig library
//!
//! This crate provides the data side of a swaying-object conversion: the scene
//! graph both avatars live in, the humanoid skeleton mapping, the source
//! physics-bone components, and the destination spring-bone components.
//!
//! # Overview
//!
//! - **Scene graph**: a tree of named nodes with local transforms, exposed to
//!   the converter through the [`SceneGraph`] trait and implemented in memory
//!   by [`Scene`].
//! - **Humanoid mapping**: [`HumanoidBone`] identifiers mapped to nodes by a
//!   [`SkeletonBoneMap`].
//! - **Source rig**: physics-bone chains and colliders, provided by
//!   [`PhysBoneSource`].
//! - **Destination rig**: [`SpringBone`] and [`SpringBoneColliderGroup`]
//!   components stored on scene nodes.
//!
//! # Example
//!
//! ```
//! use springport_rig::{Avatar, HumanoidBone, LocalTransform, Scene, SceneGraph, SkeletonBoneMap};
//!
//! let mut scene = Scene::new("Avatar");
//! let hips = scene.add_child(scene.root(), "Hips", LocalTransform::default());
//! let spine = scene.add_child(hips, "Spine", LocalTransform::default());
//!
//! let mut skeleton = SkeletonBoneMap::new();
//! skeleton.insert(HumanoidBone::Hips, hips).unwrap();
//! skeleton.insert(HumanoidBone::Spine, spine).unwrap();
//!
//! let avatar = Avatar::new(scene, skeleton);
//! assert_eq!(avatar.scene.path_relative_to(spine, avatar.root).as_deref(), Some("Hips/Spine"));
//! ```
//!
//! # Modules
//!
//! - [`avatar`]: Avatar type bundling a scene with its humanoid mapping
//! - [`error`]: Error type for rig loading and construction
//! - [`graph`]: The read-only scene graph interface
//! - [`humanoid`]: Humanoid bone identifiers and the skeleton bone map
//! - [`physbone`]: Source physics-bone chains and colliders
//! - [`scene`]: In-memory scene graph implementation
//! - [`spring`]: Destination spring-bone components

pub mod avatar;
pub mod error;
pub mod graph;
pub mod humanoid;
pub mod physbone;
pub mod scene;
pub mod spring;

// Re-export commonly used types at the crate root
pub use avatar::{Avatar, AvatarKind};
pub use error::RigError;
pub use graph::{Ancestors, SceneGraph};
pub use humanoid::{HumanoidBone, SkeletonBoneMap};
pub use physbone::{
    AdvancedBool, ColliderId, ColliderShape, Curve, ImmobileType, Keyframe, PhysBoneChain,
    PhysBoneCollider, PhysBoneParameters, PhysBoneRig, PhysBoneSource,
};
pub use scene::{ComponentKind, LocalTransform, Node, NodeId, Scene};
pub use spring::{SphereCollider, SpringBone, SpringBoneColliderGroup};

pub use glam::{Quat, Vec3};
