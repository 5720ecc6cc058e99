//! Re-expressing points and distances from one node's space in another's.
//!
//! Both hierarchies may be scaled differently. Quantities are carried over
//! proportionally: a distance authored on a source node is multiplied by the
//! ratio of destination to source lossy scale, so a rig scaled up by `k`
//! gets colliders `k` times larger.

use glam::Vec3;
use springport_rig::{NodeId, SceneGraph};

/// Per-axis ratio of destination to source lossy scale.
///
/// A zero source axis contributes a ratio of 1 rather than infinity.
pub fn scale_ratio<S, D>(
    source: &S,
    source_node: NodeId,
    destination: &D,
    destination_node: NodeId,
) -> Vec3
where
    S: SceneGraph + ?Sized,
    D: SceneGraph + ?Sized,
{
    let from = source.lossy_scale(source_node);
    let to = destination.lossy_scale(destination_node);
    Vec3::new(
        axis_ratio(from.x, to.x),
        axis_ratio(from.y, to.y),
        axis_ratio(from.z, to.z),
    )
}

fn axis_ratio(from: f32, to: f32) -> f32 {
    if from.abs() <= f32::EPSILON {
        1.0
    } else {
        to / from
    }
}

/// Converts a distance (e.g. a radius) authored on `source_node` into
/// `destination_node`'s space. Uses the X axis, as radii are uniform.
pub fn calculate_distance<S, D>(
    source: &S,
    source_node: NodeId,
    distance: f32,
    destination: &D,
    destination_node: NodeId,
) -> f32
where
    S: SceneGraph + ?Sized,
    D: SceneGraph + ?Sized,
{
    distance * scale_ratio(source, source_node, destination, destination_node).x
}

/// Rescales an offset authored on `source_node` without touching its
/// orientation.
pub fn rescale_offset<S, D>(
    source: &S,
    source_node: NodeId,
    offset: Vec3,
    destination: &D,
    destination_node: NodeId,
) -> Vec3
where
    S: SceneGraph + ?Sized,
    D: SceneGraph + ?Sized,
{
    offset * scale_ratio(source, source_node, destination, destination_node)
}

/// Rotates an offset into `node`'s local frame, so that it keeps its
/// physical placement relative to the bone when the bone's own orientation
/// differs from the source's.
pub fn compensate_rotation<G: SceneGraph + ?Sized>(graph: &G, node: NodeId, offset: Vec3) -> Vec3 {
    graph.world_rotation(node).inverse() * offset
}

/// Converts an offset authored on `source_node` into `destination_node`'s
/// local space: rescale, then rotation compensation.
pub fn calculate_offset<S, D>(
    source: &S,
    source_node: NodeId,
    offset: Vec3,
    destination: &D,
    destination_node: NodeId,
) -> Vec3
where
    S: SceneGraph + ?Sized,
    D: SceneGraph + ?Sized,
{
    let scaled = rescale_offset(source, source_node, offset, destination, destination_node);
    compensate_rotation(destination, destination_node, scaled)
}
