//! Test fixture utilities for building humanoid rigs.
//!
//! [`RigBuilder`] lays out a small humanoid skeleton (spine, head, arms with
//! middle fingers, legs) below an armature node, so tests can vary the
//! details that matter for conversion: overall scale, armature naming, and
//! missing bones.

use springport_rig::{
    Avatar, AvatarKind, ColliderId, HumanoidBone, LocalTransform, NodeId, PhysBoneChain,
    PhysBoneCollider, PhysBoneRig, PhysBoneSource, Quat, Scene, SkeletonBoneMap, Vec3,
};
use std::path::{Path, PathBuf};

/// Bone, node name, parent bone (`None` = armature), local position.
const LAYOUT: &[(HumanoidBone, &str, Option<HumanoidBone>, [f32; 3])] = &[
    (HumanoidBone::Hips, "Hips", None, [0.0, 1.0, 0.0]),
    (HumanoidBone::Spine, "Spine", Some(HumanoidBone::Hips), [0.0, 0.1, 0.0]),
    (HumanoidBone::Chest, "Chest", Some(HumanoidBone::Spine), [0.0, 0.15, 0.0]),
    (HumanoidBone::Neck, "Neck", Some(HumanoidBone::Chest), [0.0, 0.2, 0.0]),
    (HumanoidBone::Head, "Head", Some(HumanoidBone::Neck), [0.0, 0.1, 0.0]),
    (HumanoidBone::LeftShoulder, "Shoulder.L", Some(HumanoidBone::Chest), [0.05, 0.15, 0.0]),
    (HumanoidBone::LeftUpperArm, "UpperArm.L", Some(HumanoidBone::LeftShoulder), [0.1, 0.0, 0.0]),
    (HumanoidBone::LeftLowerArm, "LowerArm.L", Some(HumanoidBone::LeftUpperArm), [0.25, 0.0, 0.0]),
    (HumanoidBone::LeftHand, "Hand.L", Some(HumanoidBone::LeftLowerArm), [0.25, 0.0, 0.0]),
    (HumanoidBone::LeftMiddleProximal, "Middle1.L", Some(HumanoidBone::LeftHand), [0.08, 0.0, 0.0]),
    (HumanoidBone::RightShoulder, "Shoulder.R", Some(HumanoidBone::Chest), [-0.05, 0.15, 0.0]),
    (HumanoidBone::RightUpperArm, "UpperArm.R", Some(HumanoidBone::RightShoulder), [-0.1, 0.0, 0.0]),
    (HumanoidBone::RightLowerArm, "LowerArm.R", Some(HumanoidBone::RightUpperArm), [-0.25, 0.0, 0.0]),
    (HumanoidBone::RightHand, "Hand.R", Some(HumanoidBone::RightLowerArm), [-0.25, 0.0, 0.0]),
    (HumanoidBone::RightMiddleProximal, "Middle1.R", Some(HumanoidBone::RightHand), [-0.08, 0.0, 0.0]),
    (HumanoidBone::LeftUpperLeg, "UpperLeg.L", Some(HumanoidBone::Hips), [0.1, -0.05, 0.0]),
    (HumanoidBone::LeftLowerLeg, "LowerLeg.L", Some(HumanoidBone::LeftUpperLeg), [0.0, -0.45, 0.0]),
    (HumanoidBone::LeftFoot, "Foot.L", Some(HumanoidBone::LeftLowerLeg), [0.0, -0.4, 0.0]),
    (HumanoidBone::RightUpperLeg, "UpperLeg.R", Some(HumanoidBone::Hips), [-0.1, -0.05, 0.0]),
    (HumanoidBone::RightLowerLeg, "LowerLeg.R", Some(HumanoidBone::RightUpperLeg), [0.0, -0.45, 0.0]),
    (HumanoidBone::RightFoot, "Foot.R", Some(HumanoidBone::RightLowerLeg), [0.0, -0.4, 0.0]),
];

/// Distance from each hand to its middle proximal in [`LAYOUT`], at scale 1.
pub const HAND_TO_MIDDLE: f32 = 0.08;

/// Builder for a [`HumanoidRig`].
#[derive(Debug, Clone)]
pub struct RigBuilder {
    name: String,
    armature: String,
    scale: f32,
    rotations: Vec<(HumanoidBone, Quat)>,
    omitted: Vec<HumanoidBone>,
    kind: AvatarKind,
}

impl RigBuilder {
    /// Starts a rig rooted at a node named `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            armature: "Armature".to_string(),
            scale: 1.0,
            rotations: Vec::new(),
            omitted: Vec::new(),
            kind: AvatarKind::Instance,
        }
    }

    /// Renames the armature node between the root and the hips.
    pub fn armature(mut self, name: &str) -> Self {
        self.armature = name.to_string();
        self
    }

    /// Sets the uniform scale of the root node.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Gives a bone a local rotation.
    pub fn rotate(mut self, bone: HumanoidBone, rotation: Quat) -> Self {
        self.rotations.push((bone, rotation));
        self
    }

    /// Leaves a bone, and every bone below it, out of the rig.
    pub fn without(mut self, bone: HumanoidBone) -> Self {
        self.omitted.push(bone);
        self
    }

    /// Marks the avatar as an asset rather than a live instance.
    pub fn asset(mut self) -> Self {
        self.kind = AvatarKind::Asset;
        self
    }

    /// Builds the rig.
    pub fn build(self) -> HumanoidRig {
        let mut scene = Scene::new(self.name);
        let root = scene.root();
        scene.node_mut(root).transform.scale = Vec3::splat(self.scale);
        let armature = scene.add_child(root, self.armature, LocalTransform::default());

        let mut skeleton = SkeletonBoneMap::new();
        for &(bone, name, parent, position) in LAYOUT {
            if self.omitted.contains(&bone) {
                continue;
            }
            let parent = match parent {
                None => armature,
                Some(parent) => match skeleton.node(parent) {
                    Some(node) => node,
                    None => continue,
                },
            };
            let rotation = self
                .rotations
                .iter()
                .find(|(rotated, _)| *rotated == bone)
                .map(|(_, rotation)| *rotation)
                .unwrap_or(Quat::IDENTITY);
            let transform =
                LocalTransform::from_position(Vec3::from_array(position)).with_rotation(rotation);
            let node = scene.add_child(parent, name, transform);
            skeleton
                .insert(bone, node)
                .expect("layout maps each node once");
        }

        HumanoidRig {
            avatar: Avatar::new(scene, skeleton).with_kind(self.kind),
            physbones: PhysBoneRig::default(),
        }
    }
}

/// A humanoid avatar under construction, with its physics-bone components.
#[derive(Debug, Clone)]
pub struct HumanoidRig {
    pub avatar: Avatar,
    pub physbones: PhysBoneRig,
}

impl HumanoidRig {
    /// Builds the default rig named `name`.
    pub fn new(name: &str) -> Self {
        RigBuilder::new(name).build()
    }

    /// Returns the node of a humanoid bone.
    ///
    /// # Panics
    /// Panics if the bone was omitted.
    pub fn bone(&self, bone: HumanoidBone) -> NodeId {
        self.avatar
            .bone(bone)
            .unwrap_or_else(|| panic!("rig has no {} bone", bone))
    }

    /// Adds a plain node below `parent`.
    pub fn add_node(&mut self, parent: NodeId, name: &str, position: Vec3) -> NodeId {
        self.avatar
            .scene
            .add_child(parent, name, LocalTransform::from_position(position))
    }

    /// Adds a strand of `segments` nodes below the head, named
    /// `name`, `name_1`, `name_2`... Returns the first node.
    pub fn add_hair(&mut self, name: &str, segments: usize) -> NodeId {
        let head = self.bone(HumanoidBone::Head);
        self.add_strand(head, name, segments)
    }

    /// Adds a strand of `segments` nodes below the hips. Returns the first
    /// node.
    pub fn add_tail(&mut self, name: &str, segments: usize) -> NodeId {
        let hips = self.bone(HumanoidBone::Hips);
        self.add_strand(hips, name, segments)
    }

    fn add_strand(&mut self, parent: NodeId, name: &str, segments: usize) -> NodeId {
        let first = self.add_node(parent, name, Vec3::new(0.0, 0.05, -0.05));
        let mut last = first;
        for i in 1..segments {
            last = self.add_node(last, &format!("{}_{}", name, i), Vec3::new(0.0, -0.05, 0.0));
        }
        first
    }

    /// Adds a source collider.
    pub fn add_collider(&mut self, collider: PhysBoneCollider) -> ColliderId {
        self.physbones.add_collider(collider)
    }

    /// Adds a source chain.
    pub fn add_chain(&mut self, chain: PhysBoneChain) {
        self.physbones.add_chain(chain);
    }

    /// Finishes the rig, attaching the physics-bone components if any.
    pub fn into_avatar(self) -> Avatar {
        let HumanoidRig {
            avatar,
            physbones,
        } = self;
        if physbones.chains.is_empty() && physbones.colliders.is_empty() {
            avatar
        } else {
            avatar.with_physbones(PhysBoneSource::Present(physbones))
        }
    }
}

/// A chain on `node` with the given radius and collider references.
pub fn chain(node: NodeId, radius: f32, colliders: &[ColliderId]) -> PhysBoneChain {
    let mut chain = PhysBoneChain::new(node);
    chain.radius = radius;
    chain.colliders = colliders.to_vec();
    chain
}

/// Writes an avatar document into `dir` and returns its path.
pub fn write_avatar(dir: &Path, name: &str, avatar: &Avatar) -> PathBuf {
    let path = dir.join(name);
    let json = avatar.to_json_pretty().expect("avatar serializes");
    std::fs::write(&path, json).expect("Failed to write avatar file");
    path
}

/// Asserts two floats are within `1e-5`.
#[track_caller]
pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "expected {} to be close to {}",
        actual,
        expected
    );
}
