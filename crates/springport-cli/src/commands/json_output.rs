//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag on `convert` and `inspect`, so that
//! scripts and other tools can parse CLI output programmatically.

use serde::{Deserialize, Serialize};
use springport_convert::{ConversionReport, ConversionWarning, ConvertError};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable and can be used for programmatic error handling.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Avatar document is malformed
    pub const INVALID_AVATAR: &str = "CLI_002";
    /// Parameter file is malformed
    pub const INVALID_PARAMETERS: &str = "CLI_003";
    /// Avatar is not a humanoid rig
    pub const NOT_HUMANOID: &str = "CLI_004";
    /// Conversion aborted
    pub const CONVERSION_ERROR: &str = "CLI_005";
    /// Converted avatar or report could not be written
    pub const WRITE_ERROR: &str = "CLI_006";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W101")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// Node the warning is about (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<u32>,
}

/// Converts a conversion warning to its JSON form.
pub fn conversion_warning_to_json(warning: &ConversionWarning) -> JsonWarning {
    JsonWarning {
        code: warning.code.code().to_string(),
        message: warning.message.clone(),
        node: warning.node.map(|node| node.0),
    }
}

/// Converts an input error to a JSON error.
pub fn input_error_to_json(err: &InputError) -> JsonError {
    let code = match err {
        InputError::FileRead { .. } => error_codes::FILE_READ,
        InputError::InvalidAvatar { .. } => error_codes::INVALID_AVATAR,
        InputError::InvalidParameters { .. } => error_codes::INVALID_PARAMETERS,
    };
    JsonError::new(code, err.to_string()).with_file(err.path().display().to_string())
}

/// Converts a conversion error to a JSON error.
pub fn convert_error_to_json(err: &ConvertError) -> JsonError {
    let code = match err {
        ConvertError::NotHumanoid { .. } => error_codes::NOT_HUMANOID,
        ConvertError::Persist(_) | ConvertError::Io(_) => error_codes::WRITE_ERROR,
        _ => error_codes::CONVERSION_ERROR,
    };
    JsonError::new(code, err.to_string())
}

/// Summary of a successful conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// Source avatar path
    pub source: String,
    /// Destination avatar path, absent for in-place conversion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Path of the written avatar
    pub output: String,
    /// Path of the written report (if requested)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
    /// The full conversion report
    pub report: ConversionReport,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// JSON output for the `convert` command.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertOutput {
    /// Whether the conversion succeeded
    pub success: bool,
    /// Errors that aborted the conversion
    pub errors: Vec<JsonError>,
    /// Warnings collected while converting
    pub warnings: Vec<JsonWarning>,
    /// Conversion result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ConvertResult>,
}

impl ConvertOutput {
    /// Creates a successful convert output.
    pub fn success(result: ConvertResult) -> Self {
        let warnings = result
            .report
            .warnings
            .iter()
            .map(conversion_warning_to_json)
            .collect();
        Self {
            success: true,
            errors: Vec::new(),
            warnings,
            result: Some(result),
        }
    }

    /// Creates a failed convert output.
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            warnings: Vec::new(),
            result: None,
        }
    }
}
