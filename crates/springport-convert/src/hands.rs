//! Default hand collider groups.
//!
//! Chains that can be grabbed or collided with are kept out of the hands.
//! When the destination hand has no collider group yet, one is created with a
//! single sphere reaching the middle finger.

use glam::Vec3;
use springport_rig::{
    HumanoidBone, NodeId, SceneGraph, SphereCollider, SpringBoneColliderGroup,
};

use crate::converter::Session;
use crate::error::{ConversionWarning, WarningCode};
use crate::observer::Mutation;

/// Radius of a hand sphere when the middle finger is not mapped.
pub const FALLBACK_HAND_RADIUS: f32 = 0.03;

/// Hand bones paired with the finger bone that sizes their sphere.
pub const HAND_BONES: [(HumanoidBone, HumanoidBone); 2] = [
    (HumanoidBone::LeftHand, HumanoidBone::LeftMiddleProximal),
    (HumanoidBone::RightHand, HumanoidBone::RightMiddleProximal),
];

/// Builds the default collider group for `hand`.
///
/// The sphere sits at the middle finger's position relative to the hand,
/// in the hand's local frame, with a radius equal to their world distance.
pub fn hand_collider_group<G: SceneGraph + ?Sized>(
    graph: &G,
    hand: NodeId,
    middle_proximal: Option<NodeId>,
) -> SpringBoneColliderGroup {
    let Some(finger) = middle_proximal else {
        return SpringBoneColliderGroup::new(vec![SphereCollider::new(
            Vec3::ZERO,
            FALLBACK_HAND_RADIUS,
        )]);
    };

    let direction = graph.world_position(finger) - graph.world_position(hand);
    let scale = graph.lossy_scale(hand);
    let local = graph.world_rotation(hand).inverse() * direction;
    let offset = Vec3::new(
        divide_or_keep(local.x, scale.x),
        divide_or_keep(local.y, scale.y),
        divide_or_keep(local.z, scale.z),
    );
    SpringBoneColliderGroup::new(vec![SphereCollider::new(offset, direction.length())])
}

fn divide_or_keep(value: f32, scale: f32) -> f32 {
    if scale.abs() <= f32::EPSILON {
        value
    } else {
        value / scale
    }
}

/// Ensures both destination hands carry a collider group.
pub(crate) fn ensure_hand_collider_groups(session: &mut Session<'_>) {
    for (hand_bone, finger_bone) in HAND_BONES {
        let Some(hand) = session.destination.bone(hand_bone) else {
            session.report.add_warning(ConversionWarning::new(
                WarningCode::MissingHandBone,
                format!("destination avatar has no {} bone", hand_bone),
            ));
            continue;
        };
        if session.destination.scene.collider_group(hand).is_some() {
            continue;
        }

        let finger = session.destination.bone(finger_bone);
        let group = hand_collider_group(&session.destination.scene, hand, finger);
        session.destination.scene.set_collider_group(hand, group);
        session.report.hand_collider_groups_created += 1;
        session.record(hand, Mutation::AddColliderGroup);
    }
}
