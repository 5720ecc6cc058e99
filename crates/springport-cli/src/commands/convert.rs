//! Convert command implementation
//!
//! Converts the physics bones of a source avatar document into spring bones
//! on a destination document (or the source itself) and writes the result.

use anyhow::Result;
use colored::Colorize;
use springport_convert::{
    ConversionReport, ConvertError, ConvertOptions, Converter, OverwriteMode, ParameterScale,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{
    convert_error_to_json, error_codes, input_error_to_json, ConvertOutput, ConvertResult,
    JsonError,
};
use crate::input::{load_avatar, load_parameters, InputError};
use crate::sink::{default_output_path, JsonFileSink};

/// Arguments of the convert command.
#[derive(Debug, Clone, Copy)]
pub struct ConvertArgs<'a> {
    /// Source avatar document
    pub source: &'a str,
    /// Destination avatar document; `None` converts the source in place
    pub destination: Option<&'a str>,
    /// Output path (default: derived from the destination, else the source)
    pub output: Option<&'a str>,
    /// Overwrite mode name ("replace" or "merge")
    pub overwrite: &'a str,
    /// Skip collider conversion
    pub ignore_colliders: bool,
    /// Parameter scale file
    pub parameters: Option<&'a str>,
    /// Report output path
    pub report: Option<&'a str>,
    /// Whether to output machine-readable JSON
    pub json: bool,
}

/// What a successful run produced.
#[derive(Debug)]
pub struct Outcome {
    pub report: ConversionReport,
    pub output: PathBuf,
    pub report_path: Option<PathBuf>,
    pub duration_ms: u64,
}

/// Why a run failed.
#[derive(Debug)]
pub enum Failure {
    /// Unusable option value.
    Options(String),
    /// An input file could not be loaded.
    Input(InputError),
    /// The conversion itself aborted.
    Convert(ConvertError),
    /// The report could not be written.
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Options(message) => write!(f, "{}", message),
            Failure::Input(err) => write!(f, "{}", err),
            Failure::Convert(err) => write!(f, "conversion failed: {}", err),
            Failure::WriteReport { path, source } => {
                write!(f, "failed to write report '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Failure::Options(_) => None,
            Failure::Input(err) => Some(err),
            Failure::Convert(err) => Some(err),
            Failure::WriteReport { source, .. } => Some(source),
        }
    }
}

impl From<InputError> for Failure {
    fn from(err: InputError) -> Self {
        Failure::Input(err)
    }
}

impl From<ConvertError> for Failure {
    fn from(err: ConvertError) -> Self {
        Failure::Convert(err)
    }
}

impl Failure {
    fn to_json(&self) -> JsonError {
        match self {
            Failure::Options(message) => JsonError::new(error_codes::CONVERSION_ERROR, message),
            Failure::Input(err) => input_error_to_json(err),
            Failure::Convert(err) => convert_error_to_json(err),
            Failure::WriteReport { path, .. } => {
                JsonError::new(error_codes::WRITE_ERROR, self.to_string())
                    .with_file(path.display().to_string())
            }
        }
    }
}

/// Run the convert command
///
/// # Returns
/// Exit code: 0 on success, 1 if the conversion failed
pub fn run(args: &ConvertArgs<'_>) -> Result<ExitCode> {
    if args.json {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Loads the inputs, converts, and writes the outputs.
pub fn execute(args: &ConvertArgs<'_>) -> std::result::Result<Outcome, Failure> {
    let start = Instant::now();

    let overwrite: OverwriteMode = args.overwrite.parse().map_err(Failure::Options)?;
    let parameters = match args.parameters {
        Some(path) => load_parameters(Path::new(path))?,
        None => ParameterScale::default(),
    };
    let options = ConvertOptions {
        overwrite,
        ignore_colliders: args.ignore_colliders,
    };

    let mut source = load_avatar(Path::new(args.source))?;
    let output = match args.output {
        Some(path) => PathBuf::from(path),
        None => default_output_path(Path::new(args.destination.unwrap_or(args.source))),
    };

    let mut sink = JsonFileSink::new(&output);
    let mut converter = Converter::new(options)
        .parameters(&parameters)
        .sink(&mut sink);
    let report = match args.destination {
        Some(path) => {
            let mut destination = load_avatar(Path::new(path))?;
            converter.convert(&source, &mut destination)?
        }
        None => converter.convert_in_place(&mut source)?,
    };

    let report_path = match args.report {
        Some(path) => {
            let path = PathBuf::from(path);
            let json = report.to_json_pretty().map_err(ConvertError::from)?;
            std::fs::write(&path, json).map_err(|source| Failure::WriteReport {
                path: path.clone(),
                source,
            })?;
            Some(path)
        }
        None => None,
    };

    Ok(Outcome {
        report,
        output,
        report_path,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Run convert with human-readable (colored) output
fn run_human(args: &ConvertArgs<'_>) -> Result<ExitCode> {
    println!("{} {}", "Converting:".cyan().bold(), args.source);
    match args.destination {
        Some(destination) => println!("{} {}", "Destination:".dimmed(), destination),
        None => println!("{} in place", "Destination:".dimmed()),
    }

    let outcome = execute(args)?;
    print_report(&outcome.report);

    if let Some(path) = &outcome.report_path {
        println!("{} {}", "Report:".dimmed(), path.display());
    }
    println!(
        "\n{} Wrote {} ({}ms)",
        "SUCCESS".green().bold(),
        outcome.output.display(),
        outcome.duration_ms
    );
    Ok(ExitCode::SUCCESS)
}

/// Run convert with machine-readable JSON output
fn run_json(args: &ConvertArgs<'_>) -> Result<ExitCode> {
    let (output, code) = match execute(args) {
        Ok(outcome) => {
            let result = ConvertResult {
                source: args.source.to_string(),
                destination: args.destination.map(str::to_string),
                output: outcome.output.display().to_string(),
                report_path: outcome.report_path.map(|p| p.display().to_string()),
                report: outcome.report,
                duration_ms: outcome.duration_ms,
            };
            (ConvertOutput::success(result), ExitCode::SUCCESS)
        }
        Err(failure) => (
            ConvertOutput::failure(vec![failure.to_json()]),
            ExitCode::from(1),
        ),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

/// Print the conversion report to the console
fn print_report(report: &ConversionReport) {
    let stages: Vec<&str> = report.stages.iter().map(|stage| stage.as_str()).collect();
    println!("{} {}", "Stages:".dimmed(), stages.join(" -> "));

    if report.destroyed_spring_bones > 0 || report.destroyed_collider_groups > 0 {
        println!(
            "  {} spring bone(s) and {} collider group(s) removed",
            report.destroyed_spring_bones, report.destroyed_collider_groups
        );
    }
    println!(
        "  {} collider group(s) created, {} merged",
        report.collider_groups_created, report.collider_groups_merged
    );
    println!(
        "  {} hand collider group(s) created",
        report.hand_collider_groups_created
    );
    println!("  {} spring bone(s) created", report.spring_bones_created);
    if report.skipped_references > 0 {
        println!(
            "  {}",
            format!("{} reference(s) skipped", report.skipped_references).dimmed()
        );
    }

    if !report.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &report.warnings {
            let node_info = warning
                .node
                .map(|node| format!(" at {}", node))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                node_info.dimmed(),
                warning.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use springport_convert::SECONDARY_NODE_NAME;
    use springport_rig::{
        Avatar, HumanoidBone, LocalTransform, PhysBoneChain, PhysBoneCollider, PhysBoneRig,
        PhysBoneSource, Scene, SceneGraph, SkeletonBoneMap, Vec3,
    };
    use tempfile::tempdir;

    fn avatar(with_rig: bool) -> Avatar {
        let mut scene = Scene::new("Avatar");
        let hips = scene.add_child(scene.root(), "Hips", LocalTransform::default());
        let head = scene.add_child(hips, "Head", LocalTransform::default());
        let hair = scene.add_child(head, "Hair", LocalTransform::default());
        let mut skeleton = SkeletonBoneMap::new();
        skeleton.insert(HumanoidBone::Hips, hips).unwrap();
        skeleton.insert(HumanoidBone::Head, head).unwrap();
        let mut avatar = Avatar::new(scene, skeleton);
        if with_rig {
            let mut rig = PhysBoneRig::default();
            let collider = rig.add_collider(PhysBoneCollider::sphere(head, 0.1, Vec3::ZERO));
            let mut chain = PhysBoneChain::new(hair);
            chain.colliders.push(collider);
            rig.add_chain(chain);
            avatar.physbones = PhysBoneSource::Present(rig);
        }
        avatar
    }

    fn write(dir: &Path, name: &str, avatar: &Avatar) -> String {
        let path = dir.join(name);
        std::fs::write(&path, avatar.to_json_pretty().unwrap()).unwrap();
        path.display().to_string()
    }

    fn args<'a>(source: &'a str) -> ConvertArgs<'a> {
        ConvertArgs {
            source,
            destination: None,
            output: None,
            overwrite: "replace",
            ignore_colliders: false,
            parameters: None,
            report: None,
            json: false,
        }
    }

    #[test]
    fn test_convert_to_destination_writes_output() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "source.json", &avatar(true));
        let destination = write(dir.path(), "destination.json", &avatar(false));
        let report = dir.path().join("report.json").display().to_string();

        let outcome = execute(&ConvertArgs {
            destination: Some(&destination),
            report: Some(&report),
            ..args(&source)
        })
        .unwrap();

        assert_eq!(outcome.output, dir.path().join("destination.converted.json"));
        assert_eq!(outcome.report.spring_bones_created, 1);

        let written = load_avatar(&outcome.output).unwrap();
        let secondary = written
            .scene
            .find_path(written.root, SECONDARY_NODE_NAME)
            .unwrap();
        assert_eq!(written.scene.spring_bones(secondary).len(), 1);

        let report_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(report_json["spring_bones_created"], 1);
        assert_eq!(report_json["stages"][4], "persisted");
    }

    #[test]
    fn test_convert_in_place_uses_source_output_path() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "alice.json", &avatar(true));

        let outcome = execute(&args(&source)).unwrap();

        assert_eq!(outcome.output, dir.path().join("alice.converted.json"));
        assert!(outcome.output.exists());
    }

    #[test]
    fn test_parameters_file_is_applied() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "source.json", &avatar(true));
        let parameters = dir.path().join("scale.json");
        std::fs::write(&parameters, r#"{ "gravity_scale": 0.0 }"#).unwrap();
        let parameters = parameters.display().to_string();

        let outcome = execute(&ConvertArgs {
            parameters: Some(&parameters),
            ..args(&source)
        })
        .unwrap();
        assert_eq!(outcome.report.spring_bones_created, 1);
    }

    #[test]
    fn test_non_humanoid_destination_fails() {
        let dir = tempdir().unwrap();
        let source = write(dir.path(), "source.json", &avatar(true));
        let prop = Avatar::new(Scene::new("Prop"), SkeletonBoneMap::new());
        let destination = write(dir.path(), "prop.json", &prop);

        let failure = execute(&ConvertArgs {
            destination: Some(&destination),
            ..args(&source)
        })
        .unwrap_err();

        assert!(matches!(
            failure,
            Failure::Convert(ConvertError::NotHumanoid { .. })
        ));
        assert_eq!(failure.to_json().code, error_codes::NOT_HUMANOID);
        assert!(!dir.path().join("prop.converted.json").exists());
    }

    #[test]
    fn test_missing_source_fails_with_file_read() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("missing.json").display().to_string();

        let failure = execute(&args(&source)).unwrap_err();
        assert_eq!(failure.to_json().code, error_codes::FILE_READ);
    }
}
