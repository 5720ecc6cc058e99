//! Read-only scene graph interface.
//!
//! The converter never walks nodes directly; everything it needs from a
//! hierarchy goes through [`SceneGraph`]. Only the four structural accessors
//! are required, the path and world-space helpers are derived from them.

use glam::{Quat, Vec3};

use crate::scene::{LocalTransform, NodeId};

/// A tree of named nodes with local transforms.
pub trait SceneGraph {
    /// Returns the node's name.
    fn name(&self, id: NodeId) -> &str;

    /// Returns the node's parent, or `None` for the root.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Returns the node's children in order.
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Returns the node's transform relative to its parent.
    fn local_transform(&self, id: NodeId) -> &LocalTransform;

    /// Iterates from `id` (inclusive) up to the root.
    fn ancestors(&self, id: NodeId) -> Ancestors<'_, Self> {
        Ancestors {
            graph: self,
            next: Some(id),
        }
    }

    /// Returns true if `ancestor` is `id` itself or lies above it.
    fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|node| node == ancestor)
    }

    /// Returns the slash-separated names from below `root` down to `id`.
    ///
    /// The path of `root` relative to itself is the empty string. Returns
    /// `None` if `id` is not under `root`.
    fn path_relative_to(&self, id: NodeId, root: NodeId) -> Option<String> {
        let mut names = Vec::new();
        for node in self.ancestors(id) {
            if node == root {
                names.reverse();
                return Some(names.join("/"));
            }
            names.push(self.name(node));
        }
        None
    }

    /// Follows `path` down from `from`, taking the first child with a matching
    /// name at each segment.
    fn find_path(&self, from: NodeId, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(from);
        }
        path.split('/').try_fold(from, |node, segment| {
            self.children(node)
                .iter()
                .copied()
                .find(|&child| self.name(child) == segment)
        })
    }

    /// Returns `id` and everything below it in pre-order.
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            result.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        result
    }

    /// Accumulated scale from the root down to `id`.
    ///
    /// Rotation skew is ignored, so the result is exact only when every
    /// ancestor is uniformly scaled or unrotated.
    fn lossy_scale(&self, id: NodeId) -> Vec3 {
        self.ancestors(id)
            .fold(Vec3::ONE, |scale, node| scale * self.local_transform(node).scale)
    }

    /// Rotation of `id` in world space.
    fn world_rotation(&self, id: NodeId) -> Quat {
        world_frame(self, id).1
    }

    /// Position of `id` in world space.
    fn world_position(&self, id: NodeId) -> Vec3 {
        world_frame(self, id).0
    }

    /// The node's local +Y axis in world space.
    fn world_up(&self, id: NodeId) -> Vec3 {
        self.world_rotation(id) * Vec3::Y
    }
}

/// Iterator over a node and its ancestors, nearest first.
pub struct Ancestors<'a, G: ?Sized> {
    graph: &'a G,
    next: Option<NodeId>,
}

impl<'a, G: SceneGraph + ?Sized> Iterator for Ancestors<'a, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.graph.parent(current);
        Some(current)
    }
}

/// Composes local transforms from the root down, returning world position,
/// rotation, and lossy scale.
fn world_frame<G: SceneGraph + ?Sized>(graph: &G, id: NodeId) -> (Vec3, Quat, Vec3) {
    let chain: Vec<NodeId> = graph.ancestors(id).collect();
    chain.iter().rev().fold(
        (Vec3::ZERO, Quat::IDENTITY, Vec3::ONE),
        |(position, rotation, scale), &node| {
            let local = graph.local_transform(node);
            (
                position + rotation * (scale * local.position),
                rotation * local.rotation,
                scale * local.scale,
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use std::f32::consts::FRAC_PI_2;

    fn sample() -> (Scene, NodeId, NodeId, NodeId) {
        let mut scene = Scene::new("Root");
        let hips = scene.add_child(
            scene.root(),
            "Hips",
            LocalTransform::from_position(Vec3::new(0.0, 1.0, 0.0)),
        );
        let spine = scene.add_child(hips, "Spine", LocalTransform::default());
        let hair = scene.add_child(spine, "Hair", LocalTransform::default());
        (scene, hips, spine, hair)
    }

    #[test]
    fn test_path_relative_to() {
        let (scene, hips, spine, hair) = sample();
        assert_eq!(
            scene.path_relative_to(hair, scene.root()).as_deref(),
            Some("Hips/Spine/Hair")
        );
        assert_eq!(scene.path_relative_to(hair, spine).as_deref(), Some("Hair"));
        assert_eq!(scene.path_relative_to(hips, hips).as_deref(), Some(""));
        assert_eq!(scene.path_relative_to(hips, hair), None);
    }

    #[test]
    fn test_find_path() {
        let (scene, hips, _, hair) = sample();
        assert_eq!(scene.find_path(scene.root(), "Hips/Spine/Hair"), Some(hair));
        assert_eq!(scene.find_path(hips, ""), Some(hips));
        assert_eq!(scene.find_path(scene.root(), "Hips/Chest"), None);
    }

    #[test]
    fn test_is_descendant_of_is_inclusive() {
        let (scene, hips, spine, _) = sample();
        assert!(scene.is_descendant_of(spine, hips));
        assert!(scene.is_descendant_of(hips, hips));
        assert!(!scene.is_descendant_of(hips, spine));
    }

    #[test]
    fn test_descendants_pre_order() {
        let (mut scene, hips, spine, hair) = sample();
        let leg = scene.add_child(hips, "UpperLeg", LocalTransform::default());
        assert_eq!(scene.descendants(hips), vec![hips, spine, hair, leg]);
    }

    #[test]
    fn test_world_frame_composes_scale_and_rotation() {
        let mut scene = Scene::new("Root");
        let root = scene.root();
        scene.node_mut(root).transform.scale = Vec3::splat(2.0);
        let arm = scene.add_child(
            root,
            "Arm",
            LocalTransform::new(
                Vec3::new(1.0, 0.0, 0.0),
                Quat::from_rotation_z(FRAC_PI_2),
                Vec3::ONE,
            ),
        );
        let hand = scene.add_child(arm, "Hand", LocalTransform::from_position(Vec3::X));

        assert!((scene.lossy_scale(hand) - Vec3::splat(2.0)).length() < 1e-6);
        // Arm sits at (2, 0, 0); its +X now points along world +Y.
        assert!((scene.world_position(hand) - Vec3::new(2.0, 2.0, 0.0)).length() < 1e-5);
        assert!((scene.world_up(arm) - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }
}
