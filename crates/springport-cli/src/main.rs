//! springport CLI - Command-line interface for spring-bone conversion
//!
//! This binary converts physics-bone rigs stored in avatar documents into
//! spring-bone rigs and inspects avatar documents.

mod cli_args;

use clap::Parser;
use std::process::ExitCode;

use cli_args::{Cli, Commands};
use springport_cli::commands;
use springport_cli::commands::convert::ConvertArgs;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            source,
            destination,
            output,
            overwrite,
            ignore_colliders,
            parameters,
            report,
            json,
        } => commands::convert::run(&ConvertArgs {
            source: &source,
            destination: destination.as_deref(),
            output: output.as_deref(),
            overwrite: &overwrite,
            ignore_colliders,
            parameters: parameters.as_deref(),
            report: report.as_deref(),
            json,
        }),
        Commands::Inspect { avatar, json } => commands::inspect::run(&avatar, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
