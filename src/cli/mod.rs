//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod build;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// copy-views - Write the views copy manifest for a package build graph
#[derive(Parser)]
#[command(name = "copy-views")]
#[command(about = "Collect package views directories into an ordered copy manifest")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every package in a build graph and write the manifest
    Build {
        /// Build graph description (JSON)
        #[arg(short, long)]
        graph: PathBuf,

        /// Override output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Path to copy-views.toml (default: search upwards from cwd)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail when two packages share a graph index
        #[arg(long)]
        strict: bool,

        /// Number of resolver workers
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print the manifest instead of writing it
        #[arg(long)]
        dry_run: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Report progress as JSON lines on stderr
        #[arg(long)]
        json: bool,
    },

    /// Remove a previously written manifest
    Clean {
        /// Override output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Path to copy-views.toml (default: search upwards from cwd)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_INVALID_ARGS)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            };
        }
    };

    match cli.command {
        Commands::Build { graph, out, config, strict, jobs, dry_run, verbose, json } => {
            build::run_build(build::BuildArgs {
                graph: &graph,
                out: out.as_deref(),
                config: config.as_deref(),
                strict,
                jobs,
                dry_run,
                verbose,
                json,
            })
        }
        Commands::Clean { out, config } => build::run_clean(out.as_deref(), config.as_deref()),
    }
}
