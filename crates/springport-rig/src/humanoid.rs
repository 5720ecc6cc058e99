//! Humanoid bone identifiers and the skeleton bone map.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::RigError;
use crate::scene::NodeId;

macro_rules! humanoid_bones {
    ($($variant:ident => $name:literal,)*) => {
        /// Standard humanoid joints shared across avatar rigs.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum HumanoidBone {
            $(
                #[allow(missing_docs)]
                $variant,
            )*
        }

        impl HumanoidBone {
            /// Returns the bone identifier as a string.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(HumanoidBone::$variant => $name,)*
                }
            }

            /// Returns all humanoid bones.
            pub fn all() -> &'static [HumanoidBone] {
                &[$(HumanoidBone::$variant,)*]
            }
        }

        impl std::str::FromStr for HumanoidBone {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(HumanoidBone::$variant),)*
                    _ => Err(format!("unknown humanoid bone: {}", s)),
                }
            }
        }
    };
}

humanoid_bones! {
    Hips => "hips",
    LeftUpperLeg => "left_upper_leg",
    RightUpperLeg => "right_upper_leg",
    LeftLowerLeg => "left_lower_leg",
    RightLowerLeg => "right_lower_leg",
    LeftFoot => "left_foot",
    RightFoot => "right_foot",
    Spine => "spine",
    Chest => "chest",
    UpperChest => "upper_chest",
    Neck => "neck",
    Head => "head",
    LeftShoulder => "left_shoulder",
    RightShoulder => "right_shoulder",
    LeftUpperArm => "left_upper_arm",
    RightUpperArm => "right_upper_arm",
    LeftLowerArm => "left_lower_arm",
    RightLowerArm => "right_lower_arm",
    LeftHand => "left_hand",
    RightHand => "right_hand",
    LeftToes => "left_toes",
    RightToes => "right_toes",
    LeftEye => "left_eye",
    RightEye => "right_eye",
    Jaw => "jaw",
    LeftThumbProximal => "left_thumb_proximal",
    LeftThumbIntermediate => "left_thumb_intermediate",
    LeftThumbDistal => "left_thumb_distal",
    LeftIndexProximal => "left_index_proximal",
    LeftIndexIntermediate => "left_index_intermediate",
    LeftIndexDistal => "left_index_distal",
    LeftMiddleProximal => "left_middle_proximal",
    LeftMiddleIntermediate => "left_middle_intermediate",
    LeftMiddleDistal => "left_middle_distal",
    LeftRingProximal => "left_ring_proximal",
    LeftRingIntermediate => "left_ring_intermediate",
    LeftRingDistal => "left_ring_distal",
    LeftLittleProximal => "left_little_proximal",
    LeftLittleIntermediate => "left_little_intermediate",
    LeftLittleDistal => "left_little_distal",
    RightThumbProximal => "right_thumb_proximal",
    RightThumbIntermediate => "right_thumb_intermediate",
    RightThumbDistal => "right_thumb_distal",
    RightIndexProximal => "right_index_proximal",
    RightIndexIntermediate => "right_index_intermediate",
    RightIndexDistal => "right_index_distal",
    RightMiddleProximal => "right_middle_proximal",
    RightMiddleIntermediate => "right_middle_intermediate",
    RightMiddleDistal => "right_middle_distal",
    RightRingProximal => "right_ring_proximal",
    RightRingIntermediate => "right_ring_intermediate",
    RightRingDistal => "right_ring_distal",
    RightLittleProximal => "right_little_proximal",
    RightLittleIntermediate => "right_little_intermediate",
    RightLittleDistal => "right_little_distal",
}

impl std::fmt::Display for HumanoidBone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mapping from humanoid bone to the node that plays its role.
///
/// Each node is mapped by at most one bone, so the reverse lookup is
/// unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<HumanoidBone, NodeId>", into = "BTreeMap<HumanoidBone, NodeId>")]
pub struct SkeletonBoneMap {
    bones: BTreeMap<HumanoidBone, NodeId>,
    nodes: HashMap<NodeId, HumanoidBone>,
}

impl SkeletonBoneMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `bone` to `node`, replacing any previous node for `bone`.
    ///
    /// Fails if `node` already plays the role of a different bone.
    pub fn insert(&mut self, bone: HumanoidBone, node: NodeId) -> Result<(), RigError> {
        if let Some(&existing) = self.nodes.get(&node) {
            if existing != bone {
                return Err(RigError::DuplicateSkeletonNode {
                    bone,
                    node,
                    existing,
                });
            }
        }
        if let Some(previous) = self.bones.insert(bone, node) {
            self.nodes.remove(&previous);
        }
        self.nodes.insert(node, bone);
        Ok(())
    }

    /// Returns the node mapped to `bone`.
    pub fn node(&self, bone: HumanoidBone) -> Option<NodeId> {
        self.bones.get(&bone).copied()
    }

    /// Returns the bone that `node` plays, if any.
    pub fn bone_for(&self, node: NodeId) -> Option<HumanoidBone> {
        self.nodes.get(&node).copied()
    }

    /// Returns true if `node` is a registered skeleton bone.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Iterates over mapped bones in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (HumanoidBone, NodeId)> + '_ {
        self.bones.iter().map(|(&bone, &node)| (bone, node))
    }

    /// Returns the number of mapped bones.
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// Returns true if no bones are mapped.
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

impl TryFrom<BTreeMap<HumanoidBone, NodeId>> for SkeletonBoneMap {
    type Error = RigError;

    fn try_from(bones: BTreeMap<HumanoidBone, NodeId>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for (bone, node) in bones {
            map.insert(bone, node)?;
        }
        Ok(map)
    }
}

impl From<SkeletonBoneMap> for BTreeMap<HumanoidBone, NodeId> {
    fn from(map: SkeletonBoneMap) -> Self {
        map.bones
    }
}
