//! springport conversion library
//!
//! Converts a physics-bone rig authored on one humanoid avatar into a
//! spring-bone rig on another, whose skeleton may differ in scale, bone
//! orientation, naming, and depth.
//!
//! # Overview
//!
//! A conversion runs these stages in order (see [`ConversionStage`]):
//!
//! 1. **Start**: under [`OverwriteMode::Replace`], existing spring bones and
//!    collider groups on the destination are removed.
//! 2. **Colliders**: every source collider node gets a destination collider
//!    group of spheres ([`colliders`]). Skipped with `ignore_colliders`.
//! 3. **Hands**: both hands get a default collider group if they lack one
//!    ([`hands`]).
//! 4. **Chains**: source chains are grouped by signature and emitted as
//!    spring bones on the secondary node ([`chains`]).
//! 5. **Persisted**: the destination is handed to the [`AssetSink`].
//!
//! Source references are matched to destination nodes by the [`resolver`];
//! distances and offsets are carried over by the [`geometry`] functions.
//!
//! # Example
//!
//! ```
//! use springport_convert::{convert, ConvertOptions};
//! use springport_rig::{
//!     Avatar, HumanoidBone, LocalTransform, PhysBoneChain, PhysBoneRig, PhysBoneSource, Scene,
//!     SkeletonBoneMap,
//! };
//!
//! fn avatar() -> (Avatar, springport_rig::NodeId) {
//!     let mut scene = Scene::new("Avatar");
//!     let hips = scene.add_child(scene.root(), "Hips", LocalTransform::default());
//!     let tail = scene.add_child(hips, "Tail", LocalTransform::default());
//!     let mut skeleton = SkeletonBoneMap::new();
//!     skeleton.insert(HumanoidBone::Hips, hips).unwrap();
//!     (Avatar::new(scene, skeleton), tail)
//! }
//!
//! let (mut source, tail) = avatar();
//! let mut rig = PhysBoneRig::default();
//! rig.add_chain(PhysBoneChain::new(tail));
//! source.physbones = PhysBoneSource::Present(rig);
//!
//! let (mut destination, _) = avatar();
//! let report = convert(&source, &mut destination, ConvertOptions::default()).unwrap();
//! assert_eq!(report.spring_bones_created, 1);
//! ```
//!
//! # Modules
//!
//! - [`chains`]: Chain grouping and spring-bone synthesis
//! - [`colliders`]: Collider to sphere conversion and collider groups
//! - [`converter`]: The staged conversion entry points
//! - [`error`]: Error and warning types
//! - [`geometry`]: Distance and offset conversion between node spaces
//! - [`hands`]: Default hand collider groups
//! - [`observer`]: Mutation observer and persistence collaborators
//! - [`params`]: Parameter conversion policies
//! - [`report`]: Conversion report
//! - [`resolver`]: Bone correspondence between avatars

pub mod chains;
pub mod colliders;
pub mod converter;
pub mod error;
pub mod geometry;
pub mod hands;
pub mod observer;
pub mod params;
pub mod report;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use chains::{chain_signature, is_hair_like, SECONDARY_NODE_NAME};
pub use colliders::{convert_collider, group_attachment};
pub use converter::{convert, convert_in_place, ConvertOptions, Converter, OverwriteMode};
pub use error::{ConversionWarning, ConvertError, WarningCode};
pub use geometry::{calculate_distance, calculate_offset};
pub use hands::{hand_collider_group, FALLBACK_HAND_RADIUS};
pub use observer::{AssetSink, Mutation, MutationLog, MutationObserver, NoopObserver, NullSink};
pub use params::{ChainContext, ParameterScale, ParametersConverter, SpringBoneParameters};
pub use report::{ConversionReport, ConversionStage};
pub use resolver::{find_corresponding_bone, resolve, Correspondence, MatchMethod};
