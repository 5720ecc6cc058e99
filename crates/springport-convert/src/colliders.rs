//! Source colliders to destination sphere collider groups.

use springport_rig::{
    Avatar, ColliderShape, NodeId, PhysBoneCollider, SceneGraph, SphereCollider,
    SpringBoneColliderGroup,
};

use crate::converter::Session;
use crate::error::{ConversionWarning, ConvertError, WarningCode};
use crate::geometry::{calculate_distance, compensate_rotation, rescale_offset};
use crate::observer::Mutation;
use crate::report::ConversionReport;
use crate::resolver::find_corresponding_bone;

/// Converts one source collider into spheres in `destination_node`'s local
/// space.
///
/// Spheres and short capsules give one sphere. A capsule longer than its
/// diameter gives three: the center and one cap at each end along the
/// destination node's up axis. Planes give none and add a warning.
pub fn convert_collider(
    source: &Avatar,
    collider: &PhysBoneCollider,
    destination: &Avatar,
    destination_node: NodeId,
    report: &mut ConversionReport,
) -> Vec<SphereCollider> {
    collider_spheres(source, collider, destination, destination_node, report)
        .into_iter()
        .map(|sphere| {
            SphereCollider::new(
                compensate_rotation(&destination.scene, destination_node, sphere.offset),
                sphere.radius,
            )
        })
        .collect()
}

/// Spheres rescaled into the destination but not yet rotation compensated.
fn collider_spheres(
    source: &Avatar,
    collider: &PhysBoneCollider,
    destination: &Avatar,
    destination_node: NodeId,
    report: &mut ConversionReport,
) -> Vec<SphereCollider> {
    if collider.shape == ColliderShape::Plane {
        let path = source
            .scene
            .path_relative_to(collider.node, source.root)
            .unwrap_or_else(|| source.scene.name(collider.node).to_string());
        report.add_warning(ConversionWarning::with_node(
            WarningCode::PlaneCollider,
            format!("plane colliders cannot be converted: {}", path),
            collider.node,
        ));
        return Vec::new();
    }

    let mut centers = vec![collider.position];
    if collider.shape == ColliderShape::Capsule && collider.height > collider.radius * 2.0 {
        let up = destination.scene.world_up(destination_node);
        let distance = (collider.height - collider.radius * 2.0) / 2.0;
        centers.push(collider.position + up * distance);
        centers.push(collider.position - up * distance);
    }

    let radius = calculate_distance(
        &source.scene,
        collider.node,
        collider.radius,
        &destination.scene,
        destination_node,
    );
    centers
        .into_iter()
        .map(|center| {
            let offset = rescale_offset(
                &source.scene,
                collider.node,
                center,
                &destination.scene,
                destination_node,
            );
            SphereCollider::new(offset, radius)
        })
        .collect()
}

/// Returns the destination node that hosts the collider group for the
/// colliders on `source_node`.
///
/// That is the node's own correspondence, relocated to the correspondence of
/// a collider's root override when one resolves. With several overrides on
/// the same node, the last resolvable one wins.
pub fn group_attachment(
    source: &Avatar,
    destination: &Avatar,
    source_node: NodeId,
) -> Result<Option<NodeId>, ConvertError> {
    let Some(mut target) = find_corresponding_bone(source, destination, source_node)? else {
        return Ok(None);
    };
    let overrides = source
        .physbones
        .colliders()
        .iter()
        .filter(|collider| collider.node == source_node)
        .filter_map(|collider| collider.root);
    for root in overrides {
        if let Some(relocated) = find_corresponding_bone(source, destination, root)? {
            target = relocated;
        }
    }
    Ok(Some(target))
}

/// Builds or extends one destination collider group per source collider node.
pub(crate) fn convert_collider_groups(session: &mut Session<'_>) -> Result<(), ConvertError> {
    let source = session.source;

    let mut by_node: Vec<(NodeId, Vec<&PhysBoneCollider>)> = Vec::new();
    for collider in source.physbones.colliders() {
        match by_node.iter_mut().find(|(node, _)| *node == collider.node) {
            Some((_, colliders)) => colliders.push(collider),
            None => by_node.push((collider.node, vec![collider])),
        }
    }

    for (source_node, colliders) in by_node {
        let Some(target) = group_attachment(source, session.destination, source_node)? else {
            session.report.skipped_references += 1;
            continue;
        };

        // Spheres joining an existing group are scaled once more by the
        // group node's own scale.
        let destination = &*session.destination;
        let existing = destination.scene.collider_group(target).is_some();
        let node_scale = destination.scene.lossy_scale(target);
        let mut spheres = Vec::new();
        for collider in colliders {
            for sphere in
                collider_spheres(source, collider, destination, target, &mut session.report)
            {
                let (offset, radius) = if existing {
                    (sphere.offset * node_scale, sphere.radius * node_scale.x)
                } else {
                    (sphere.offset, sphere.radius)
                };
                spheres.push(SphereCollider::new(
                    compensate_rotation(&destination.scene, target, offset),
                    radius,
                ));
            }
        }

        let scene = &mut session.destination.scene;
        match scene.collider_group_mut(target) {
            Some(group) => {
                group.colliders.extend(spheres);
                session.report.collider_groups_merged += 1;
                session.record(target, Mutation::ModifyColliderGroup);
            }
            None => {
                scene.set_collider_group(target, SpringBoneColliderGroup::new(spheres));
                session.report.collider_groups_created += 1;
                session.record(target, Mutation::AddColliderGroup);
            }
        }
    }
    Ok(())
}
