//! Inspect command implementation
//!
//! Summarizes an avatar document: its humanoid mapping, source physics-bone
//! components, and existing spring-bone components.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use springport_rig::{Avatar, ColliderShape, HumanoidBone, NodeId, SceneGraph};
use std::path::Path;
use std::process::ExitCode;

use crate::input::load_avatar;

/// Summary of one avatar document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvatarSummary {
    /// Name of the avatar root node
    pub root: String,
    /// Number of nodes in the scene
    pub nodes: usize,
    /// Mapped humanoid bones and their paths below the root
    pub humanoid_bones: Vec<(HumanoidBone, String)>,
    /// Whether physics-bone components are present
    pub physbones_present: bool,
    /// Source chains, by path of their owning node
    pub chains: Vec<String>,
    /// Source colliders by shape
    pub sphere_colliders: usize,
    pub capsule_colliders: usize,
    pub plane_colliders: usize,
    /// Nodes carrying a spring-bone collider group
    pub collider_groups: Vec<String>,
    /// Number of spring bones on all nodes
    pub spring_bones: usize,
}

impl AvatarSummary {
    /// Summarizes `avatar`.
    pub fn of(avatar: &Avatar) -> Self {
        let scene = &avatar.scene;
        let path = |node: NodeId| {
            scene
                .path_relative_to(node, avatar.root)
                .unwrap_or_else(|| scene.name(node).to_string())
        };
        let count = |shape: ColliderShape| {
            avatar
                .physbones
                .colliders()
                .iter()
                .filter(|collider| collider.shape == shape)
                .count()
        };
        let nodes = scene.descendants(avatar.root);

        Self {
            root: scene.name(avatar.root).to_string(),
            nodes: nodes.len(),
            humanoid_bones: avatar
                .skeleton
                .iter()
                .map(|(bone, node)| (bone, path(node)))
                .collect(),
            physbones_present: avatar.physbones.is_present(),
            chains: avatar
                .physbones
                .chains()
                .iter()
                .map(|chain| path(chain.node))
                .collect(),
            sphere_colliders: count(ColliderShape::Sphere),
            capsule_colliders: count(ColliderShape::Capsule),
            plane_colliders: count(ColliderShape::Plane),
            collider_groups: nodes
                .iter()
                .filter(|&&node| scene.collider_group(node).is_some())
                .map(|&node| path(node))
                .collect(),
            spring_bones: nodes
                .iter()
                .map(|&node| scene.spring_bones(node).len())
                .sum(),
        }
    }
}

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(avatar_path: &str, json_output: bool) -> Result<ExitCode> {
    let avatar = load_avatar(Path::new(avatar_path))
        .with_context(|| format!("Failed to load avatar: {}", avatar_path))?;
    let summary = AvatarSummary::of(&avatar);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(avatar_path, &summary);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(avatar_path: &str, summary: &AvatarSummary) {
    println!("{} {}", "Inspecting:".cyan().bold(), avatar_path);
    println!("{} {} ({} nodes)", "Root:".dimmed(), summary.root, summary.nodes);

    println!("\n{}", "Humanoid bones:".bold());
    if summary.humanoid_bones.is_empty() {
        println!("  {}", "none".dimmed());
    }
    for (bone, path) in &summary.humanoid_bones {
        println!("  {:<24} {}", bone.as_str(), path.dimmed());
    }

    println!("\n{}", "Physics bones:".bold());
    if summary.physbones_present {
        println!("  {} chain(s)", summary.chains.len());
        for chain in &summary.chains {
            println!("    {}", chain);
        }
        println!(
            "  {} sphere, {} capsule, {} plane collider(s)",
            summary.sphere_colliders, summary.capsule_colliders, summary.plane_colliders
        );
        if summary.plane_colliders > 0 {
            println!(
                "  {} plane colliders will be skipped by conversion",
                "!".yellow()
            );
        }
    } else {
        println!("  {}", "absent".dimmed());
    }

    println!("\n{}", "Spring bones:".bold());
    println!("  {} spring bone(s)", summary.spring_bones);
    println!("  {} collider group(s)", summary.collider_groups.len());
    for group in &summary.collider_groups {
        println!("    {}", group);
    }
}
