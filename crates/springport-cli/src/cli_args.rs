//! CLI argument definitions for the springport command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// springport - Physics-bone to spring-bone conversion
#[derive(Parser)]
#[command(name = "springport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Convert an avatar's physics bones into spring bones
    Convert {
        /// Path to the source avatar document
        #[arg(short, long)]
        source: String,

        /// Path to the destination avatar document (default: convert the source in place)
        #[arg(short, long)]
        destination: Option<String>,

        /// Output path for the converted avatar (default: <input>.converted.json)
        #[arg(short, long)]
        output: Option<String>,

        /// What to do with spring components already on the destination
        #[arg(long, default_value = "replace", value_parser = ["replace", "merge"])]
        overwrite: String,

        /// Skip collider conversion and default hand colliders on chains
        #[arg(long)]
        ignore_colliders: bool,

        /// JSON file with parameter scale factors used for chain grouping
        #[arg(long)]
        parameters: Option<String>,

        /// Write the conversion report to this path
        #[arg(long)]
        report: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show the humanoid mapping and swaying-object components of an avatar
    Inspect {
        /// Path to the avatar document
        #[arg(short, long)]
        avatar: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
