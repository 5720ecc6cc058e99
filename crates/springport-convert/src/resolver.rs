//! Bone correspondence between two humanoid avatars.
//!
//! A source node is matched to a destination node by, in order: its path
//! from the avatar root, its path from the closest humanoid skeleton bone
//! above it, and finally its name anywhere below that skeleton bone's
//! destination counterpart.

use serde::Serialize;
use springport_rig::{Avatar, HumanoidBone, NodeId, SceneGraph, SkeletonBoneMap};

use crate::error::ConvertError;

/// How a correspondence was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Identical path below both avatar roots.
    RootPath,
    /// Identical path below corresponding humanoid skeleton bones.
    SkeletonPath,
    /// Same name below the corresponding humanoid skeleton bone.
    Name,
}

/// A resolved destination node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Correspondence {
    /// The destination node.
    pub node: NodeId,
    /// How it was found.
    pub method: MatchMethod,
}

/// Returns the destination node corresponding to `source_node`.
///
/// `Ok(None)` means no correspondence; callers skip the reference.
pub fn find_corresponding_bone(
    source: &Avatar,
    destination: &Avatar,
    source_node: NodeId,
) -> Result<Option<NodeId>, ConvertError> {
    Ok(resolve(source, destination, source_node)?.map(|found| found.node))
}

/// Like [`find_corresponding_bone`], also reporting the match method.
pub fn resolve(
    source: &Avatar,
    destination: &Avatar,
    source_node: NodeId,
) -> Result<Option<Correspondence>, ConvertError> {
    let src = &source.scene;
    let dst = &destination.scene;

    let Some(root_path) = src.path_relative_to(source_node, source.root) else {
        return Ok(None);
    };
    if let Some(node) = dst.find_path(destination.root, &root_path) {
        return Ok(Some(Correspondence {
            node,
            method: MatchMethod::RootPath,
        }));
    }

    // Accessories outside the humanoid hierarchy have no reliable anchor.
    match source.hips() {
        Some(hips) if src.is_descendant_of(source_node, hips) => {}
        _ => return Ok(None),
    }

    let (bone, anchor) = closest_skeleton_bone(src, &source.skeleton, source_node)?;
    let Some(destination_anchor) = destination.bone(bone) else {
        return Ok(None);
    };

    let anchor_path = src
        .path_relative_to(source_node, anchor)
        .unwrap_or_default();
    if let Some(node) = dst.find_path(destination_anchor, &anchor_path) {
        return Ok(Some(Correspondence {
            node,
            method: MatchMethod::SkeletonPath,
        }));
    }

    let name = src.name(source_node);
    Ok(dst
        .descendants(destination_anchor)
        .into_iter()
        .find(|&candidate| dst.name(candidate) == name)
        .map(|node| Correspondence {
            node,
            method: MatchMethod::Name,
        }))
}

/// Walks outward from `node` (inclusive) to the first registered skeleton
/// bone.
pub(crate) fn closest_skeleton_bone<G: SceneGraph + ?Sized>(
    graph: &G,
    skeleton: &SkeletonBoneMap,
    node: NodeId,
) -> Result<(HumanoidBone, NodeId), ConvertError> {
    graph
        .ancestors(node)
        .find_map(|ancestor| skeleton.bone_for(ancestor).map(|bone| (bone, ancestor)))
        .ok_or(ConvertError::NoSkeletonAncestor { node })
}

#[cfg(test)]
mod tests {
    use super::*;
    use springport_rig::{LocalTransform, Scene};

    struct Rig {
        avatar: Avatar,
        hips: NodeId,
        head: NodeId,
    }

    /// Root/Armature/Hips/Spine/Head with Hips, Spine, and Head mapped.
    fn rig(root: &str, armature: &str) -> Rig {
        let mut scene = Scene::new(root);
        let armature = scene.add_child(scene.root(), armature, LocalTransform::default());
        let hips = scene.add_child(armature, "Hips", LocalTransform::default());
        let spine = scene.add_child(hips, "Spine", LocalTransform::default());
        let head = scene.add_child(spine, "Head", LocalTransform::default());
        let mut skeleton = SkeletonBoneMap::new();
        skeleton.insert(HumanoidBone::Hips, hips).unwrap();
        skeleton.insert(HumanoidBone::Spine, spine).unwrap();
        skeleton.insert(HumanoidBone::Head, head).unwrap();
        Rig {
            avatar: Avatar::new(scene, skeleton),
            hips,
            head,
        }
    }

    #[test]
    fn test_root_path_match() {
        let mut source = rig("A", "Armature");
        let mut destination = rig("B", "Armature");
        let hair = source
            .avatar
            .scene
            .add_child(source.head, "Hair", LocalTransform::default());
        let dest_hair = destination
            .avatar
            .scene
            .add_child(destination.head, "Hair", LocalTransform::default());

        let found = resolve(&source.avatar, &destination.avatar, hair).unwrap();
        assert_eq!(
            found,
            Some(Correspondence {
                node: dest_hair,
                method: MatchMethod::RootPath
            })
        );
    }

    #[test]
    fn test_skeleton_path_match_across_renamed_armature() {
        let mut source = rig("A", "Armature");
        let mut destination = rig("B", "Skeleton");
        let hair = source
            .avatar
            .scene
            .add_child(source.head, "Hair", LocalTransform::default());
        let tip = source
            .avatar
            .scene
            .add_child(hair, "HairTip", LocalTransform::default());
        let dest_hair = destination
            .avatar
            .scene
            .add_child(destination.head, "Hair", LocalTransform::default());
        let dest_tip = destination
            .avatar
            .scene
            .add_child(dest_hair, "HairTip", LocalTransform::default());

        let found = resolve(&source.avatar, &destination.avatar, tip)
            .unwrap()
            .unwrap();
        assert_eq!(found.node, dest_tip);
        assert_eq!(found.method, MatchMethod::SkeletonPath);
    }

    #[test]
    fn test_name_fallback_below_anchor() {
        let mut source = rig("A", "Armature");
        let mut destination = rig("B", "Skeleton");
        let hair = source
            .avatar
            .scene
            .add_child(source.head, "Hair", LocalTransform::default());
        let wrapper = destination
            .avatar
            .scene
            .add_child(destination.head, "HairRoot", LocalTransform::default());
        let dest_hair = destination
            .avatar
            .scene
            .add_child(wrapper, "Hair", LocalTransform::default());

        let found = resolve(&source.avatar, &destination.avatar, hair)
            .unwrap()
            .unwrap();
        assert_eq!(found.node, dest_hair);
        assert_eq!(found.method, MatchMethod::Name);
    }

    #[test]
    fn test_node_outside_hips_is_unresolved() {
        let mut source = rig("A", "Armature");
        let destination = rig("B", "Skeleton");
        let root = source.avatar.root;
        let prop = source
            .avatar
            .scene
            .add_child(root, "Prop", LocalTransform::default());

        assert_eq!(
            find_corresponding_bone(&source.avatar, &destination.avatar, prop).unwrap(),
            None
        );
    }

    #[test]
    fn test_node_outside_source_root_is_unresolved() {
        let mut source = rig("A", "Armature");
        let destination = rig("A", "Armature");
        // Re-root the source avatar at Hips; the armature is now outside it.
        source.avatar.root = source.hips;
        let armature = source.avatar.scene.parent(source.hips).unwrap();

        assert_eq!(
            find_corresponding_bone(&source.avatar, &destination.avatar, armature).unwrap(),
            None
        );
    }

    #[test]
    fn test_missing_destination_anchor_is_unresolved() {
        let mut source = rig("A", "Armature");
        let mut destination = rig("B", "Skeleton");
        let hair = source
            .avatar
            .scene
            .add_child(source.head, "Hair", LocalTransform::default());
        destination.avatar.skeleton = SkeletonBoneMap::new();
        destination
            .avatar
            .skeleton
            .insert(HumanoidBone::Hips, destination.hips)
            .unwrap();

        assert_eq!(
            find_corresponding_bone(&source.avatar, &destination.avatar, hair).unwrap(),
            None
        );
    }

    #[test]
    fn test_closest_skeleton_bone_includes_self() {
        let source = rig("A", "Armature");
        let (bone, node) =
            closest_skeleton_bone(&source.avatar.scene, &source.avatar.skeleton, source.head)
                .unwrap();
        assert_eq!(bone, HumanoidBone::Head);
        assert_eq!(node, source.head);
    }

    #[test]
    fn test_closest_skeleton_bone_without_anchor_is_an_error() {
        let source = rig("A", "Armature");
        let root = source.avatar.root;
        let err = closest_skeleton_bone(&source.avatar.scene, &source.avatar.skeleton, root)
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoSkeletonAncestor { node } if node == root));
    }
}
