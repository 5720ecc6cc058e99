//! Avatar type: a scene plus its humanoid mapping.

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::humanoid::{HumanoidBone, SkeletonBoneMap};
use crate::physbone::PhysBoneSource;
use crate::scene::{NodeId, Scene};

/// Whether an avatar is a live scene instance or a stored asset.
///
/// Mutations of an instance are reported to the conversion's mutation
/// observer; assets are mutated directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarKind {
    #[default]
    Instance,
    Asset,
}

/// A humanoid avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    /// The scene holding the avatar.
    pub scene: Scene,
    /// Avatar root within the scene.
    #[serde(default)]
    pub root: NodeId,
    /// Humanoid bone mapping.
    pub skeleton: SkeletonBoneMap,
    /// Source physics-bone components.
    #[serde(default)]
    pub physbones: PhysBoneSource,
    /// Instance or asset.
    #[serde(default)]
    pub kind: AvatarKind,
}

impl Avatar {
    /// Creates an instance avatar rooted at the scene root, with no
    /// physics-bone components.
    pub fn new(scene: Scene, skeleton: SkeletonBoneMap) -> Self {
        let root = scene.root();
        Self {
            scene,
            root,
            skeleton,
            physbones: PhysBoneSource::Absent,
            kind: AvatarKind::Instance,
        }
    }

    /// Builder method to attach physics-bone components.
    pub fn with_physbones(mut self, physbones: PhysBoneSource) -> Self {
        self.physbones = physbones;
        self
    }

    /// Builder method to set the avatar kind.
    pub fn with_kind(mut self, kind: AvatarKind) -> Self {
        self.kind = kind;
        self
    }

    /// Parses an avatar from JSON and validates its node references.
    pub fn from_json(json: &str) -> Result<Self, RigError> {
        let avatar: Self = serde_json::from_str(json)?;
        avatar.validate()?;
        Ok(avatar)
    }

    /// Serializes the avatar to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the node mapped to `bone`.
    pub fn bone(&self, bone: HumanoidBone) -> Option<NodeId> {
        self.skeleton.node(bone)
    }

    /// Returns the hips node.
    pub fn hips(&self) -> Option<NodeId> {
        self.bone(HumanoidBone::Hips)
    }

    /// Returns true if the avatar is a live instance.
    pub fn is_instance(&self) -> bool {
        self.kind == AvatarKind::Instance
    }

    /// Checks that every node id the avatar refers to exists in its scene.
    pub fn validate(&self) -> Result<(), RigError> {
        self.scene.check(self.root)?;
        for (_, node) in self.skeleton.iter() {
            self.scene.check(node)?;
        }
        for collider in self.physbones.colliders() {
            self.scene.check(collider.node)?;
            if let Some(root) = collider.root {
                self.scene.check(root)?;
            }
        }
        for chain in self.physbones.chains() {
            self.scene.check(chain.node)?;
            if let Some(root) = chain.root {
                self.scene.check(root)?;
            }
        }
        for id in self.scene.node_ids() {
            let node = self.scene.node(id);
            for spring_bone in &node.spring_bones {
                for &referenced in spring_bone.root_bones.iter().chain(&spring_bone.collider_groups) {
                    self.scene.check(referenced)?;
                }
            }
        }
        Ok(())
    }
}
