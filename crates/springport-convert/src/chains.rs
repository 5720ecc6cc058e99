//! Source chains to destination spring bones.
//!
//! Each chain is reduced to a signature built from its policy parameters,
//! its radius in destination space, and its collider groups. Chains sharing
//! a signature become one spring bone on the secondary node.

use std::collections::HashMap;

use glam::Vec3;
use springport_rig::{Avatar, NodeId, PhysBoneChain, SceneGraph, SpringBone};

use crate::colliders::group_attachment;
use crate::converter::Session;
use crate::error::ConvertError;
use crate::geometry::calculate_distance;
use crate::hands::HAND_BONES;
use crate::observer::Mutation;
use crate::params::{ChainContext, ParametersConverter, SpringBoneParameters};
use crate::report::ConversionReport;
use crate::resolver::find_corresponding_bone;

/// Name of the destination node hosting converted spring bones.
pub const SECONDARY_NODE_NAME: &str = "secondary";

/// Name fragments marking a chain as hair-like (compared lowercase).
pub const HAIR_KEYWORDS: [&str; 3] = ["hair", "ahoge", "tail"];

/// Stiffness of hair-like spring bones.
pub const HAIR_STIFFNESS: f32 = 0.5;

/// Stiffness of all other spring bones.
pub const DEFAULT_STIFFNESS: f32 = 1.0;

/// Gravity power of every emitted spring bone.
pub const GRAVITY_POWER: f32 = 0.0;

/// Drag force of every emitted spring bone.
pub const DRAG_FORCE: f32 = 0.65;

/// Returns true if a root bone name marks its chain as hair-like.
pub fn is_hair_like(name: &str) -> bool {
    let name = name.to_lowercase();
    HAIR_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

/// Builds the grouping key of a chain.
///
/// One line each for stiffness, gravity, drag and radius with two decimals,
/// then one line per collider group path suffixed with the chain tag.
pub fn chain_signature(
    parameters: &SpringBoneParameters,
    radius: f32,
    collider_group_paths: &[String],
    tag: &str,
) -> String {
    let mut lines: Vec<String> = [
        parameters.stiffness_force,
        parameters.gravity_power,
        parameters.drag_force,
        radius,
    ]
    .iter()
    .map(|&value| format!("{:.2}", round_half_away(value)))
    .collect();
    lines.extend(
        collider_group_paths
            .iter()
            .map(|path| format!("{}{}", path, tag)),
    );
    lines.join("\n")
}

/// Rounds to two decimals with midpoints going away from zero, so that
/// `0.125` keys as `0.13` rather than the half-to-even `0.12`.
fn round_half_away(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// A source chain with its destination collider groups.
struct PreparedChain<'s> {
    chain: &'s PhysBoneChain,
    collider_groups: Vec<NodeId>,
}

/// Converts every source chain and emits one spring bone per signature.
pub(crate) fn convert_chains(
    session: &mut Session<'_>,
    parameters: &dyn ParametersConverter,
    ignore_colliders: bool,
) -> Result<(), ConvertError> {
    let source = session.source;
    let destination = &*session.destination;

    let hand_groups: Vec<NodeId> = HAND_BONES
        .iter()
        .filter_map(|(hand, _)| destination.bone(*hand))
        .filter(|&hand| destination.scene.collider_group(hand).is_some())
        .collect();
    let destination_name = destination.scene.name(destination.root);

    let mut groups: Vec<Vec<PreparedChain<'_>>> = Vec::new();
    let mut by_signature: HashMap<String, usize> = HashMap::new();
    for chain in source.physbones.chains() {
        let mut collider_groups =
            chain_collider_groups(source, destination, chain, &mut session.report)?;
        if !ignore_colliders && chain.interacts_with_hands() {
            for &hand in &hand_groups {
                if !collider_groups.contains(&hand) {
                    collider_groups.push(hand);
                }
            }
        }

        let context = ChainContext {
            tag: chain.tag.as_deref(),
            chain_name: source.scene.name(chain.node),
            destination_name,
        };
        let converted = parameters.convert(&chain.parameters, &context);
        let radius = calculate_distance(
            &source.scene,
            chain.node,
            chain.radius,
            &destination.scene,
            destination.root,
        );
        let paths: Vec<String> = collider_groups
            .iter()
            .map(|&group| {
                destination
                    .scene
                    .path_relative_to(group, destination.root)
                    .unwrap_or_default()
            })
            .collect();
        let signature =
            chain_signature(&converted, radius, &paths, chain.tag.as_deref().unwrap_or(""));

        let prepared = PreparedChain {
            chain,
            collider_groups,
        };
        match by_signature.get(&signature) {
            Some(&index) => groups[index].push(prepared),
            None => {
                by_signature.insert(signature, groups.len());
                groups.push(vec![prepared]);
            }
        }
    }

    for group in &groups {
        emit_spring_bone(session, group)?;
    }
    Ok(())
}

/// Resolves the destination collider groups a chain collides with.
///
/// Missing colliders, colliders outside the source root and unresolved
/// colliders are skipped and counted. Nodes without a group are ignored.
fn chain_collider_groups(
    source: &Avatar,
    destination: &Avatar,
    chain: &PhysBoneChain,
    report: &mut ConversionReport,
) -> Result<Vec<NodeId>, ConvertError> {
    let mut groups = Vec::new();
    for &id in &chain.colliders {
        let Some(collider) = source.physbones.collider(id) else {
            report.skipped_references += 1;
            continue;
        };
        if !source.scene.is_descendant_of(collider.node, source.root) {
            report.skipped_references += 1;
            continue;
        }
        let Some(node) = group_attachment(source, destination, collider.node)? else {
            report.skipped_references += 1;
            continue;
        };
        if destination.scene.collider_group(node).is_none() || groups.contains(&node) {
            continue;
        }
        groups.push(node);
    }
    Ok(groups)
}

fn emit_spring_bone(
    session: &mut Session<'_>,
    group: &[PreparedChain<'_>],
) -> Result<(), ConvertError> {
    let source = session.source;
    let Some(first) = group.first() else {
        return Ok(());
    };

    let mut source_roots: Vec<NodeId> = Vec::new();
    for prepared in group {
        let root = prepared.chain.root_or_node();
        if !source.scene.is_descendant_of(root, source.root) {
            session.report.skipped_references += 1;
        } else if !source_roots.contains(&root) {
            source_roots.push(root);
        }
    }

    let mut root_bones = Vec::new();
    for root in source_roots {
        match find_corresponding_bone(source, session.destination, root)? {
            Some(node) => root_bones.push(node),
            None => session.report.skipped_references += 1,
        }
    }
    if root_bones.is_empty() {
        return Ok(());
    }

    let scene = &session.destination.scene;
    let hair_like = root_bones.iter().any(|&node| is_hair_like(scene.name(node)));
    let comment = match first.chain.tag.as_deref() {
        Some(tag) if !tag.trim().is_empty() => tag.to_string(),
        _ => scene.name(root_bones[0]).to_string(),
    };

    let secondary = session.secondary();
    let hit_radius = calculate_distance(
        &source.scene,
        first.chain.node,
        first.chain.radius,
        &session.destination.scene,
        secondary,
    );
    let spring_bone = SpringBone {
        comment,
        stiffness_force: if hair_like {
            HAIR_STIFFNESS
        } else {
            DEFAULT_STIFFNESS
        },
        gravity_power: GRAVITY_POWER,
        gravity_dir: Vec3::NEG_Y,
        drag_force: DRAG_FORCE,
        root_bones,
        hit_radius,
        collider_groups: first.collider_groups.clone(),
    };
    session
        .destination
        .scene
        .add_spring_bone(secondary, spring_bone);
    session.report.spring_bones_created += 1;
    session.record(secondary, Mutation::AddSpringBone);
    Ok(())
}
