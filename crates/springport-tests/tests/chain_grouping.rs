//! Chain grouping and hair classification tests.
//!
//! Chains whose converted parameters, radius, collider groups and tag agree
//! merge into one spring bone; any difference keeps them apart.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p springport-tests --test chain_grouping
//! ```

use pretty_assertions::assert_eq;
use springport_convert::{
    convert, ChainContext, ConvertOptions, Converter, ParameterScale, ParametersConverter,
    SpringBoneParameters, SECONDARY_NODE_NAME,
};
use springport_rig::{
    AdvancedBool, Avatar, HumanoidBone, PhysBoneChain, PhysBoneCollider, PhysBoneParameters,
    SceneGraph, SpringBone, Vec3,
};
use springport_tests::fixtures::{chain, HumanoidRig};
use std::cell::RefCell;

/// Source and destination rigs with two hair strands each.
fn rigs() -> (HumanoidRig, HumanoidRig) {
    let mut source = HumanoidRig::new("Source");
    source.add_hair("HairL", 3);
    source.add_hair("HairR", 3);
    let mut destination = HumanoidRig::new("Destination");
    destination.add_hair("HairL", 3);
    destination.add_hair("HairR", 3);
    (source, destination)
}

fn strand(rig: &HumanoidRig, name: &str) -> springport_rig::NodeId {
    let path = format!("Armature/Hips/Spine/Chest/Neck/Head/{}", name);
    rig.avatar
        .scene
        .find_path(rig.avatar.root, &path)
        .unwrap_or_else(|| panic!("no strand {}", name))
}

fn run(source: HumanoidRig, destination: HumanoidRig, options: ConvertOptions) -> Vec<SpringBone> {
    let source = source.into_avatar();
    let mut destination = destination.into_avatar();
    convert(&source, &mut destination, options).unwrap();
    spring_bones(&destination)
}

fn spring_bones(avatar: &Avatar) -> Vec<SpringBone> {
    avatar
        .scene
        .find_path(avatar.root, SECONDARY_NODE_NAME)
        .map(|secondary| avatar.scene.spring_bones(secondary).to_vec())
        .unwrap_or_default()
}

/// Adds one chain per strand, letting `edit` adjust the right strand's chain.
fn two_chains(source: &mut HumanoidRig, edit: impl FnOnce(&mut PhysBoneChain)) {
    let left = strand(source, "HairL");
    let right = strand(source, "HairR");
    source.add_chain(chain(left, 0.05, &[]));
    let mut right_chain = chain(right, 0.05, &[]);
    edit(&mut right_chain);
    source.add_chain(right_chain);
}

// ============================================================================
// Merging
// ============================================================================

#[test]
fn test_identical_chains_merge() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |_| {});
    let dest_left = strand(&destination, "HairL");
    let dest_right = strand(&destination, "HairR");

    let spring_bones = run(source, destination, ConvertOptions::default());

    assert_eq!(spring_bones.len(), 1);
    assert_eq!(spring_bones[0].root_bones, vec![dest_left, dest_right]);
    assert_eq!(spring_bones[0].comment, "HairL");
}

#[test]
fn test_parameters_equal_to_two_decimals_merge() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.parameters.pull = 0.201);

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 1);
}

#[test]
fn test_duplicate_roots_are_listed_once() {
    let (mut source, destination) = rigs();
    let left = strand(&source, "HairL");
    source.add_chain(chain(left, 0.05, &[]));
    source.add_chain(chain(left, 0.05, &[]));

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 1);
    assert_eq!(spring_bones[0].root_bones.len(), 1);
}

// ============================================================================
// Splitting
// ============================================================================

#[test]
fn test_different_pull_splits() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.parameters.pull = 0.5);

    assert_eq!(run(source, destination, ConvertOptions::default()).len(), 2);
}

#[test]
fn test_different_spring_splits() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.parameters.spring = 0.6);

    assert_eq!(run(source, destination, ConvertOptions::default()).len(), 2);
}

#[test]
fn test_different_gravity_splits() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.parameters.gravity = 0.1);

    assert_eq!(run(source, destination, ConvertOptions::default()).len(), 2);
}

#[test]
fn test_different_radius_splits() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.radius = 0.08);

    assert_eq!(run(source, destination, ConvertOptions::default()).len(), 2);
}

#[test]
fn test_different_collider_groups_split() {
    let (mut source, destination) = rigs();
    let head = source.bone(HumanoidBone::Head);
    let collider = source.add_collider(PhysBoneCollider::sphere(head, 0.1, Vec3::ZERO));
    two_chains(&mut source, |chain| chain.colliders.push(collider));

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 2);
    assert_eq!(
        spring_bones[1].collider_groups.len(),
        spring_bones[0].collider_groups.len() + 1
    );
}

#[test]
fn test_different_tag_splits_when_chains_have_groups() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.tag = Some("bangs".to_string()));

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 2);
    assert_eq!(spring_bones[0].comment, "HairL");
    assert_eq!(spring_bones[1].comment, "bangs");
}

#[test]
fn test_tag_is_ignored_without_groups() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.tag = Some("bangs".to_string()));
    let options = ConvertOptions {
        ignore_colliders: true,
        ..ConvertOptions::default()
    };

    assert_eq!(run(source, destination, options).len(), 1);
}

#[test]
fn test_hand_interaction_splits() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| {
        chain.allow_collision = AdvancedBool::False;
        chain.allow_grabbing = AdvancedBool::False;
    });

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 2);
    assert_eq!(spring_bones[0].collider_groups.len(), 2);
    assert!(spring_bones[1].collider_groups.is_empty());
}

// ============================================================================
// Parameter policy
// ============================================================================

#[test]
fn test_custom_policy_decides_grouping() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.parameters.pull = 0.9);
    fn flat(_: &PhysBoneParameters, _: &ChainContext<'_>) -> SpringBoneParameters {
        SpringBoneParameters {
            stiffness_force: 1.0,
            drag_force: 0.5,
            gravity_power: 0.0,
        }
    }

    let source = source.into_avatar();
    let mut destination = destination.into_avatar();
    Converter::new(ConvertOptions::default())
        .parameters(&flat)
        .convert(&source, &mut destination)
        .unwrap();

    assert_eq!(spring_bones(&destination).len(), 1);
}

/// Records the context of every chain it converts.
#[derive(Default)]
struct RecordingPolicy {
    seen: RefCell<Vec<(Option<String>, String, String)>>,
}

impl ParametersConverter for RecordingPolicy {
    fn convert(
        &self,
        parameters: &PhysBoneParameters,
        context: &ChainContext<'_>,
    ) -> SpringBoneParameters {
        self.seen.borrow_mut().push((
            context.tag.map(str::to_string),
            context.chain_name.to_string(),
            context.destination_name.to_string(),
        ));
        ParameterScale::DEFAULT.convert(parameters, context)
    }
}

#[test]
fn test_policy_sees_tag_and_destination_name() {
    let (mut source, destination) = rigs();
    two_chains(&mut source, |chain| chain.tag = Some("bangs".to_string()));
    let policy = RecordingPolicy::default();

    let source = source.into_avatar();
    let mut destination = destination.into_avatar();
    Converter::new(ConvertOptions::default())
        .parameters(&policy)
        .convert(&source, &mut destination)
        .unwrap();

    assert_eq!(
        policy.seen.into_inner(),
        vec![
            (None, "HairL".to_string(), "Destination".to_string()),
            (
                Some("bangs".to_string()),
                "HairR".to_string(),
                "Destination".to_string()
            ),
        ]
    );
}

// ============================================================================
// Hair classification
// ============================================================================

fn stiffness_for(root_name: &str) -> f32 {
    let mut source = HumanoidRig::new("Source");
    let mut destination = HumanoidRig::new("Destination");
    let node = source.add_tail(root_name, 2);
    destination.add_tail(root_name, 2);
    source.add_chain(chain(node, 0.02, &[]));

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 1);
    spring_bones[0].stiffness_force
}

#[test]
fn test_hair_like_roots_are_softer() {
    for name in ["Tail_01", "HairFront_L", "ahoge", "AHOGE", "ponytail"] {
        assert_eq!(stiffness_for(name), 0.5, "root {}", name);
    }
}

#[test]
fn test_other_roots_use_default_stiffness() {
    for name in ["Skirt", "Ribbon", "Coat_B"] {
        assert_eq!(stiffness_for(name), 1.0, "root {}", name);
    }
}

#[test]
fn test_humanoid_bone_root_uses_default_stiffness() {
    let mut source = HumanoidRig::new("Source");
    let spine = source.bone(HumanoidBone::Spine);
    source.add_chain(chain(spine, 0.02, &[]));
    let destination = HumanoidRig::new("Destination");

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones[0].stiffness_force, 1.0);
    assert_eq!(spring_bones[0].comment, "Spine");
}

#[test]
fn test_any_hair_like_root_softens_the_group() {
    let mut source = HumanoidRig::new("Source");
    let mut destination = HumanoidRig::new("Destination");
    let skirt = source.add_tail("Skirt", 2);
    let tail = source.add_tail("Tail", 2);
    destination.add_tail("Skirt", 2);
    destination.add_tail("Tail", 2);
    source.add_chain(chain(skirt, 0.02, &[]));
    source.add_chain(chain(tail, 0.02, &[]));

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones.len(), 1);
    assert_eq!(spring_bones[0].stiffness_force, 0.5);
    assert_eq!(spring_bones[0].comment, "Skirt");
}

#[test]
fn test_explicit_root_override_is_used() {
    let mut source = HumanoidRig::new("Source");
    let mut destination = HumanoidRig::new("Destination");
    let holder = source.add_tail("Holder", 1);
    let tail = source.add_tail("Tail", 3);
    destination.add_tail("Holder", 1);
    let dest_tail = destination.add_tail("Tail", 3);
    let mut tail_chain = chain(holder, 0.02, &[]);
    tail_chain.root = Some(tail);
    source.add_chain(tail_chain);

    let spring_bones = run(source, destination, ConvertOptions::default());
    assert_eq!(spring_bones[0].root_bones, vec![dest_tail]);
    assert_eq!(spring_bones[0].stiffness_force, 0.5);
}
