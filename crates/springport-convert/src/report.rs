//! Conversion report.

use serde::Serialize;

use crate::error::ConversionWarning;

/// Stages of a conversion, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStage {
    Start,
    CollidersConverted,
    HandDefaultsEnsured,
    ChainsConverted,
    Persisted,
}

impl ConversionStage {
    /// Returns the stage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionStage::Start => "start",
            ConversionStage::CollidersConverted => "colliders_converted",
            ConversionStage::HandDefaultsEnsured => "hand_defaults_ensured",
            ConversionStage::ChainsConverted => "chains_converted",
            ConversionStage::Persisted => "persisted",
        }
    }
}

impl std::fmt::Display for ConversionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a conversion did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionReport {
    /// Stages completed, in order.
    pub stages: Vec<ConversionStage>,
    /// Spring bones removed under the replace policy.
    pub destroyed_spring_bones: usize,
    /// Collider groups removed under the replace policy.
    pub destroyed_collider_groups: usize,
    /// Collider groups created from source colliders.
    pub collider_groups_created: usize,
    /// Existing collider groups that received converted spheres.
    pub collider_groups_merged: usize,
    /// Default hand collider groups created.
    pub hand_collider_groups_created: usize,
    /// Spring bones created.
    pub spring_bones_created: usize,
    /// Source references (colliders, roots, chains) with no destination.
    pub skipped_references: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<ConversionWarning>,
}

impl ConversionReport {
    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ConversionWarning) {
        self.warnings.push(warning);
    }

    /// Marks a stage as completed.
    pub fn complete(&mut self, stage: ConversionStage) {
        self.stages.push(stage);
    }

    /// Returns the last completed stage.
    pub fn stage(&self) -> Option<ConversionStage> {
        self.stages.last().copied()
    }

    /// Returns true if `stage` was completed.
    pub fn reached(&self, stage: ConversionStage) -> bool {
        self.stages.contains(&stage)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
