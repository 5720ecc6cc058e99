//! Source physics-bone chains and colliders.
//!
//! These are read-only inputs to a conversion. A source avatar either carries
//! a [`PhysBoneRig`] or, when the authoring SDK was never installed on it,
//! nothing at all; [`PhysBoneSource::Absent`] yields no chains and no
//! colliders.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// Index of a collider within a [`PhysBoneRig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColliderId(pub u32);

/// Provider of source physics-bone components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysBoneSource {
    /// The avatar carries physics-bone components.
    Present(PhysBoneRig),
    /// The avatar has no physics-bone support.
    #[default]
    Absent,
}

impl PhysBoneSource {
    /// Returns all chains, empty when absent.
    pub fn chains(&self) -> &[PhysBoneChain] {
        match self {
            PhysBoneSource::Present(rig) => &rig.chains,
            PhysBoneSource::Absent => &[],
        }
    }

    /// Returns all colliders, empty when absent.
    pub fn colliders(&self) -> &[PhysBoneCollider] {
        match self {
            PhysBoneSource::Present(rig) => &rig.colliders,
            PhysBoneSource::Absent => &[],
        }
    }

    /// Looks up a collider; `None` for a dangling reference.
    pub fn collider(&self, id: ColliderId) -> Option<&PhysBoneCollider> {
        self.colliders().get(id.0 as usize)
    }

    /// Returns true if the provider is present.
    pub fn is_present(&self) -> bool {
        matches!(self, PhysBoneSource::Present(_))
    }
}

/// Physics-bone components of one avatar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysBoneRig {
    /// Colliders, addressed by position.
    #[serde(default)]
    pub colliders: Vec<PhysBoneCollider>,
    /// Simulated chains.
    #[serde(default)]
    pub chains: Vec<PhysBoneChain>,
}

impl PhysBoneRig {
    /// Adds a collider and returns its id.
    pub fn add_collider(&mut self, collider: PhysBoneCollider) -> ColliderId {
        self.colliders.push(collider);
        ColliderId(self.colliders.len() as u32 - 1)
    }

    /// Adds a chain.
    pub fn add_chain(&mut self, chain: PhysBoneChain) {
        self.chains.push(chain);
    }
}

/// Collider shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColliderShape {
    /// A sphere of `radius`.
    Sphere,
    /// A capsule of `radius` and end-to-end `height` along the local Y axis.
    Capsule,
    /// An infinite plane; not convertible to spheres.
    Plane,
}

/// A source collider attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysBoneCollider {
    /// Node the collider component is attached to.
    pub node: NodeId,
    /// Collider shape.
    pub shape: ColliderShape,
    /// Radius in the node's local space.
    pub radius: f32,
    /// Capsule height, end to end.
    #[serde(default)]
    pub height: f32,
    /// Center offset in the node's local space.
    #[serde(default)]
    pub position: Vec3,
    /// Node the collider should be attached to instead of `node`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeId>,
}

impl PhysBoneCollider {
    /// Creates a sphere collider centered at `position`.
    pub fn sphere(node: NodeId, radius: f32, position: Vec3) -> Self {
        Self {
            node,
            shape: ColliderShape::Sphere,
            radius,
            height: 0.0,
            position,
            root: None,
        }
    }

    /// Creates a capsule collider centered at `position`.
    pub fn capsule(node: NodeId, radius: f32, height: f32, position: Vec3) -> Self {
        Self {
            node,
            shape: ColliderShape::Capsule,
            radius,
            height,
            position,
            root: None,
        }
    }

    /// Creates a plane collider.
    pub fn plane(node: NodeId, position: Vec3) -> Self {
        Self {
            node,
            shape: ColliderShape::Plane,
            radius: 0.0,
            height: 0.0,
            position,
            root: None,
        }
    }

    /// Builder method to set the root override.
    pub fn with_root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }
}

/// Three-state toggle; anything other than `False` counts as enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedBool {
    False,
    #[default]
    True,
    Other,
}

impl AdvancedBool {
    /// Returns true unless explicitly `False`.
    pub fn is_enabled(self) -> bool {
        self != AdvancedBool::False
    }
}

/// A simulated chain of bones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysBoneChain {
    /// Node the chain component is attached to.
    pub node: NodeId,
    /// Explicit chain root; `node` is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeId>,
    /// Free-text tag (the parameter name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Collision radius in the node's local space.
    #[serde(default)]
    pub radius: f32,
    /// Simulation parameters.
    #[serde(default)]
    pub parameters: PhysBoneParameters,
    /// Whether the chain collides with the default (hand) colliders.
    #[serde(default)]
    pub allow_collision: AdvancedBool,
    /// Whether the chain can be grabbed.
    #[serde(default)]
    pub allow_grabbing: AdvancedBool,
    /// Referenced colliders, in order. May contain dangling ids.
    #[serde(default)]
    pub colliders: Vec<ColliderId>,
}

impl PhysBoneChain {
    /// Creates a chain on `node` with default parameters.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            root: None,
            tag: None,
            radius: 0.0,
            parameters: PhysBoneParameters::default(),
            allow_collision: AdvancedBool::True,
            allow_grabbing: AdvancedBool::True,
            colliders: Vec::new(),
        }
    }

    /// Returns the explicit root if set, else the owning node.
    pub fn root_or_node(&self) -> NodeId {
        self.root.unwrap_or(self.node)
    }

    /// Returns true if the chain interacts with default colliders.
    pub fn interacts_with_hands(&self) -> bool {
        self.allow_collision.is_enabled() || self.allow_grabbing.is_enabled()
    }
}

/// How a chain's immobile parameter is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImmobileType {
    #[default]
    AllMotion,
    World,
}

/// Physics-bone simulation parameters.
///
/// Each scalar may be shaped along the chain by an optional curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysBoneParameters {
    pub version: u32,
    pub pull: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_curve: Option<Curve>,
    pub spring: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spring_curve: Option<Curve>,
    pub stiffness: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stiffness_curve: Option<Curve>,
    pub gravity: f32,
    pub gravity_falloff: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity_falloff_curve: Option<Curve>,
    pub immobile_type: ImmobileType,
    pub immobile: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub immobile_curve: Option<Curve>,
    pub grab_movement: f32,
    pub max_stretch: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_stretch_curve: Option<Curve>,
}

impl Default for PhysBoneParameters {
    fn default() -> Self {
        Self {
            version: 1,
            pull: 0.2,
            pull_curve: None,
            spring: 0.2,
            spring_curve: None,
            stiffness: 0.2,
            stiffness_curve: None,
            gravity: 0.0,
            gravity_falloff: 0.0,
            gravity_falloff_curve: None,
            immobile_type: ImmobileType::AllMotion,
            immobile: 0.0,
            immobile_curve: None,
            grab_movement: 0.5,
            max_stretch: 0.0,
            max_stretch_curve: None,
        }
    }
}

/// A curve keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

/// Piecewise-linear curve over the chain, `time` running 0 at the root to 1
/// at the tip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    /// Creates a curve from keyframes, sorted by time.
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Returns the keyframes.
    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Evaluates the curve at `time`, holding the end values outside the
    /// key range. An empty curve evaluates to 1.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 1.0,
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.value;
                }
                return a.value + (b.value - a.value) * (time - a.time) / span;
            }
        }
        last.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_source_is_empty() {
        let source = PhysBoneSource::Absent;
        assert!(source.chains().is_empty());
        assert!(source.colliders().is_empty());
        assert!(source.collider(ColliderId(0)).is_none());
    }

    #[test]
    fn test_dangling_collider_reference() {
        let mut rig = PhysBoneRig::default();
        let id = rig.add_collider(PhysBoneCollider::sphere(NodeId(1), 0.1, Vec3::ZERO));
        let source = PhysBoneSource::Present(rig);
        assert!(source.collider(id).is_some());
        assert!(source.collider(ColliderId(7)).is_none());
    }

    #[test]
    fn test_chain_interaction_flags() {
        let mut chain = PhysBoneChain::new(NodeId(3));
        assert!(chain.interacts_with_hands());
        chain.allow_collision = AdvancedBool::False;
        assert!(chain.interacts_with_hands());
        chain.allow_grabbing = AdvancedBool::False;
        assert!(!chain.interacts_with_hands());
        chain.allow_grabbing = AdvancedBool::Other;
        assert!(chain.interacts_with_hands());
    }

    #[test]
    fn test_root_or_node() {
        let mut chain = PhysBoneChain::new(NodeId(3));
        assert_eq!(chain.root_or_node(), NodeId(3));
        chain.root = Some(NodeId(4));
        assert_eq!(chain.root_or_node(), NodeId(4));
    }

    #[test]
    fn test_curve_evaluate() {
        let curve = Curve::new(vec![
            Keyframe { time: 1.0, value: 0.0 },
            Keyframe { time: 0.0, value: 1.0 },
        ]);
        assert_eq!(curve.evaluate(-1.0), 1.0);
        assert!((curve.evaluate(0.25) - 0.75).abs() < 1e-6);
        assert_eq!(curve.evaluate(2.0), 0.0);
        assert_eq!(Curve::default().evaluate(0.5), 1.0);
    }

    #[test]
    fn test_source_serde_shape() {
        let json = r#"{
            "present": {
                "colliders": [
                    { "node": 2, "shape": "capsule", "radius": 0.05, "height": 0.3 }
                ],
                "chains": [
                    { "node": 5, "tag": "Skirt", "radius": 0.02, "colliders": [0, 9] }
                ]
            }
        }"#;
        let source: PhysBoneSource = serde_json::from_str(json).unwrap();
        assert_eq!(source.colliders()[0].shape, ColliderShape::Capsule);
        assert_eq!(source.chains()[0].colliders, vec![ColliderId(0), ColliderId(9)]);
        assert_eq!(source.chains()[0].parameters, PhysBoneParameters::default());

        let absent: PhysBoneSource = serde_json::from_str("\"absent\"").unwrap();
        assert!(!absent.is_present());
    }
}
