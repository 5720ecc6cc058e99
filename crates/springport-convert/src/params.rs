//! Spring-bone parameter policies.
//!
//! A policy maps a source chain's physics-bone parameters to spring-bone
//! stiffness, drag, and gravity. Its output decides which chains are merged
//! into one spring bone; the emitted spring bones themselves use fixed
//! presets (see [`crate::chains`]).

use serde::{Deserialize, Serialize};
use springport_rig::PhysBoneParameters;

/// Converted spring-bone parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpringBoneParameters {
    pub stiffness_force: f32,
    pub drag_force: f32,
    pub gravity_power: f32,
}

/// What a policy may know about the chain being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainContext<'a> {
    /// The chain's tag, if any.
    pub tag: Option<&'a str>,
    /// Name of the node the chain component is attached to.
    pub chain_name: &'a str,
    /// Name of the destination avatar's root node.
    pub destination_name: &'a str,
}

/// Parameter conversion policy.
///
/// Implemented for plain functions and closures with the matching signature.
pub trait ParametersConverter {
    /// Converts one chain's parameters.
    fn convert(
        &self,
        parameters: &PhysBoneParameters,
        context: &ChainContext<'_>,
    ) -> SpringBoneParameters;
}

impl<F> ParametersConverter for F
where
    F: Fn(&PhysBoneParameters, &ChainContext<'_>) -> SpringBoneParameters,
{
    fn convert(
        &self,
        parameters: &PhysBoneParameters,
        context: &ChainContext<'_>,
    ) -> SpringBoneParameters {
        self(parameters, context)
    }
}

/// Linear policy: each output is one input times a factor.
///
/// The default factors are `stiffness = pull * 4`, `drag = spring`,
/// `gravity = gravity * 20`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterScale {
    pub stiffness_per_pull: f32,
    pub drag_per_spring: f32,
    pub gravity_scale: f32,
}

impl ParameterScale {
    /// The default factors.
    pub const DEFAULT: ParameterScale = ParameterScale {
        stiffness_per_pull: 4.0,
        drag_per_spring: 1.0,
        gravity_scale: 20.0,
    };

    /// Parses factors from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for ParameterScale {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ParametersConverter for ParameterScale {
    fn convert(
        &self,
        parameters: &PhysBoneParameters,
        _context: &ChainContext<'_>,
    ) -> SpringBoneParameters {
        SpringBoneParameters {
            stiffness_force: parameters.pull * self.stiffness_per_pull,
            drag_force: parameters.spring * self.drag_per_spring,
            gravity_power: parameters.gravity * self.gravity_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: ChainContext<'static> = ChainContext {
        tag: None,
        chain_name: "Hair",
        destination_name: "Avatar",
    };

    #[test]
    fn test_default_scale() {
        let parameters = PhysBoneParameters {
            pull: 0.25,
            spring: 0.3,
            gravity: 0.05,
            ..PhysBoneParameters::default()
        };
        let converted = ParameterScale::default().convert(&parameters, &CONTEXT);
        assert!((converted.stiffness_force - 1.0).abs() < 1e-6);
        assert!((converted.drag_force - 0.3).abs() < 1e-6);
        assert!((converted.gravity_power - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_closure_policy() {
        let policy = |parameters: &PhysBoneParameters, context: &ChainContext<'_>| {
            SpringBoneParameters {
                stiffness_force: parameters.stiffness,
                drag_force: if context.tag.is_some() { 1.0 } else { 0.0 },
                gravity_power: 0.0,
            }
        };
        let converted = policy.convert(&PhysBoneParameters::default(), &CONTEXT);
        assert_eq!(converted.drag_force, 0.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let scale = ParameterScale::from_json(r#"{ "gravity_scale": 10.0 }"#).unwrap();
        assert_eq!(scale.gravity_scale, 10.0);
        assert_eq!(scale.stiffness_per_pull, 4.0);
        assert!(ParameterScale::from_json(r#"{ "gravity": 1 }"#).is_err());
    }
}
