//! Conversion orchestration.
//!
//! A conversion walks the stages of [`ConversionStage`] strictly in order.
//! Unresolvable references are skipped along the way; only invariant
//! violations and persistence failures abort.

use serde::{Deserialize, Serialize};
use springport_rig::{Avatar, ComponentKind, NodeId, SceneGraph};

use crate::chains::{convert_chains, SECONDARY_NODE_NAME};
use crate::colliders::convert_collider_groups;
use crate::error::ConvertError;
use crate::hands::ensure_hand_collider_groups;
use crate::observer::{AssetSink, Mutation, MutationObserver, NoopObserver};
use crate::params::{ParameterScale, ParametersConverter};
use crate::report::{ConversionReport, ConversionStage};

/// What happens to spring components already on the destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteMode {
    /// Remove every existing spring bone and collider group first.
    #[default]
    Replace,
    /// Keep existing components and add to them.
    Merge,
}

impl OverwriteMode {
    /// Returns the mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OverwriteMode::Replace => "replace",
            OverwriteMode::Merge => "merge",
        }
    }
}

impl std::fmt::Display for OverwriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OverwriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(OverwriteMode::Replace),
            "merge" => Ok(OverwriteMode::Merge),
            other => Err(format!(
                "unknown overwrite mode '{}' (expected 'replace' or 'merge')",
                other
            )),
        }
    }
}

/// Caller options for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub overwrite: OverwriteMode,
    /// Skip collider conversion and the hand groups on chains.
    pub ignore_colliders: bool,
}

/// Mutable state shared by the stages of one conversion.
pub(crate) struct Session<'a> {
    pub(crate) source: &'a Avatar,
    pub(crate) destination: &'a mut Avatar,
    pub(crate) report: ConversionReport,
    observer: &'a mut dyn MutationObserver,
    secondary: Option<NodeId>,
}

impl<'a> Session<'a> {
    fn new(
        source: &'a Avatar,
        destination: &'a mut Avatar,
        observer: &'a mut dyn MutationObserver,
    ) -> Self {
        Self {
            source,
            destination,
            report: ConversionReport::default(),
            observer,
            secondary: None,
        }
    }

    /// Reports a change; only live instances are observed.
    pub(crate) fn record(&mut self, node: NodeId, mutation: Mutation) {
        if self.destination.is_instance() {
            self.observer.record(node, mutation);
        }
    }

    /// Returns the secondary node, creating it below the destination root
    /// on first use.
    pub(crate) fn secondary(&mut self) -> NodeId {
        if let Some(node) = self.secondary {
            return node;
        }
        let root = self.destination.root;
        let (node, created) = self
            .destination
            .scene
            .find_or_create_child(root, SECONDARY_NODE_NAME);
        if created {
            self.record(node, Mutation::AddNode);
        }
        self.secondary = Some(node);
        node
    }

    /// Removes every spring bone and collider group below the destination
    /// root.
    fn destroy_existing(&mut self) {
        let root = self.destination.root;
        for node in self.destination.scene.descendants(root) {
            let scene = &mut self.destination.scene;
            let spring_bones = scene.remove_components(node, ComponentKind::SpringBone);
            let collider_groups = scene.remove_components(node, ComponentKind::ColliderGroup);
            if spring_bones > 0 {
                self.report.destroyed_spring_bones += spring_bones;
                self.record(node, Mutation::RemoveSpringBones);
            }
            if collider_groups > 0 {
                self.report.destroyed_collider_groups += collider_groups;
                self.record(node, Mutation::RemoveColliderGroup);
            }
        }
    }
}

/// Converts physics-bone rigs into spring-bone rigs.
///
/// ```
/// use springport_convert::{ConvertOptions, Converter, MutationLog};
/// # use springport_rig::{Avatar, HumanoidBone, LocalTransform, Scene, SkeletonBoneMap};
/// # fn avatar() -> Avatar {
/// #     let mut scene = Scene::new("Avatar");
/// #     let hips = scene.add_child(scene.root(), "Hips", LocalTransform::default());
/// #     let mut skeleton = SkeletonBoneMap::new();
/// #     skeleton.insert(HumanoidBone::Hips, hips).unwrap();
/// #     Avatar::new(scene, skeleton)
/// # }
/// let source = avatar();
/// let mut destination = avatar();
/// let mut log = MutationLog::new();
///
/// let report = Converter::new(ConvertOptions::default())
///     .observer(&mut log)
///     .convert(&source, &mut destination)
///     .unwrap();
/// assert!(report.warnings.len() == 2); // no hands on this rig
/// ```
pub struct Converter<'a> {
    options: ConvertOptions,
    parameters: &'a dyn ParametersConverter,
    observer: Option<&'a mut dyn MutationObserver>,
    sink: Option<&'a mut dyn AssetSink>,
}

impl<'a> Converter<'a> {
    /// Creates a converter using [`ParameterScale::DEFAULT`].
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            parameters: &ParameterScale::DEFAULT,
            observer: None,
            sink: None,
        }
    }

    /// Sets the parameter policy used for grouping.
    pub fn parameters(mut self, parameters: &'a dyn ParametersConverter) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the observer notified of changes to instance avatars.
    pub fn observer(mut self, observer: &'a mut dyn MutationObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Sets the sink that persists the converted avatar.
    pub fn sink(mut self, sink: &'a mut dyn AssetSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Converts the rig of `source` onto `destination`.
    ///
    /// Both avatars must have a hips bone.
    pub fn convert(
        &mut self,
        source: &Avatar,
        destination: &mut Avatar,
    ) -> Result<ConversionReport, ConvertError> {
        if source.hips().is_none() {
            return Err(ConvertError::NotHumanoid { avatar: "source" });
        }
        if destination.hips().is_none() {
            return Err(ConvertError::NotHumanoid {
                avatar: "destination",
            });
        }

        let report = match self.observer.as_deref_mut() {
            Some(observer) => {
                run_stages(source, destination, observer, self.parameters, self.options)?
            }
            None => run_stages(
                source,
                destination,
                &mut NoopObserver,
                self.parameters,
                self.options,
            )?,
        };
        self.persist(destination, report)
    }

    /// Converts an avatar's own rig in place, reading from a snapshot.
    pub fn convert_in_place(
        &mut self,
        avatar: &mut Avatar,
    ) -> Result<ConversionReport, ConvertError> {
        let source = avatar.clone();
        self.convert(&source, avatar)
    }

    fn persist(
        &mut self,
        destination: &Avatar,
        mut report: ConversionReport,
    ) -> Result<ConversionReport, ConvertError> {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.save(destination)?;
        }
        report.complete(ConversionStage::Persisted);
        Ok(report)
    }
}

fn run_stages(
    source: &Avatar,
    destination: &mut Avatar,
    observer: &mut dyn MutationObserver,
    parameters: &dyn ParametersConverter,
    options: ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    let mut session = Session::new(source, destination, observer);

    if options.overwrite == OverwriteMode::Replace {
        session.destroy_existing();
    }
    session.report.complete(ConversionStage::Start);

    if !options.ignore_colliders {
        convert_collider_groups(&mut session)?;
        session.report.complete(ConversionStage::CollidersConverted);
    }

    ensure_hand_collider_groups(&mut session);
    session.report.complete(ConversionStage::HandDefaultsEnsured);

    convert_chains(&mut session, parameters, options.ignore_colliders)?;
    session.report.complete(ConversionStage::ChainsConverted);

    Ok(session.report)
}

/// Converts with the default parameter policy and no collaborators.
pub fn convert(
    source: &Avatar,
    destination: &mut Avatar,
    options: ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    Converter::new(options).convert(source, destination)
}

/// Converts an avatar's own rig in place with the default parameter policy.
pub fn convert_in_place(
    avatar: &mut Avatar,
    options: ConvertOptions,
) -> Result<ConversionReport, ConvertError> {
    Converter::new(options).convert_in_place(avatar)
}
