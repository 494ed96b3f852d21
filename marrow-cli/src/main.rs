//! Marrow — skeleton freshness tracking CLI.
//!
//! # Usage
//!
//! ```text
//! marrow init
//! marrow sync [--full] [--verbose]
//! marrow status [--json] [--verbose]
//! marrow validate [--fix] [--strict]
//! marrow generate [--filter stale,missing] [--files a.ts,b.ts] [-o FILE]
//! marrow pipeline [--full] [--filter ...] [--files ...] [-o FILE]
//! marrow export [--format markdown|json] [-o FILE]
//! marrow clean
//! marrow rebuild --confirm
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{
    clean::CleanArgs, export::ExportArgs, generate::GenerateArgs, init::InitArgs,
    pipeline::PipelineArgs, rebuild::RebuildArgs, status::StatusArgs, sync::SyncArgs,
    validate::ValidateArgs,
};
use marrow_core::{CoreError, ErrorKind};
use marrow_engine::EngineError;
use marrow_scan::ScanError;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "marrow",
    version,
    about = "Track which source files have stale or missing skeleton digests",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize skeleton tracking in the current directory.
    Init(InitArgs),

    /// Reconcile the index against the current source tree.
    Sync(SyncArgs),

    /// Show index freshness at a glance.
    Status(StatusArgs),

    /// Audit every index entry against disk, optionally repairing.
    Validate(ValidateArgs),

    /// Build a regeneration prompt and mark the selected files pending.
    Generate(GenerateArgs),

    /// Run sync and generate in one step.
    Pipeline(PipelineArgs),

    /// Bundle current skeletons into a single document.
    Export(ExportArgs),

    /// Delete skeleton files the index no longer references.
    Clean(CleanArgs),

    /// Discard the index and all skeletons, then re-track from scratch.
    Rebuild(RebuildArgs),
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

/// Map an error to a process exit code: 1 for user errors, 2 for
/// filesystem errors, 4 for data errors. Errors with no recognizable
/// kind are treated as user errors.
fn exit_code(err: &anyhow::Error) -> i32 {
    let kind = if let Some(e) = err.downcast_ref::<EngineError>() {
        Some(e.kind())
    } else if let Some(e) = err.downcast_ref::<CoreError>() {
        Some(e.kind())
    } else if let Some(e) = err.downcast_ref::<ScanError>() {
        Some(e.kind())
    } else if let Some(e) = err.downcast_ref::<commands::CommandError>() {
        Some(e.kind)
    } else {
        None
    };

    match kind {
        Some(ErrorKind::Filesystem) => 2,
        Some(ErrorKind::Data) => 4,
        Some(ErrorKind::User) | None => 1,
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> Result<()> {
    let root: PathBuf =
        std::env::current_dir().context("could not determine working directory")?;

    match cli.command {
        Commands::Init(args) => args.run(&root),
        Commands::Sync(args) => args.run(&root),
        Commands::Status(args) => args.run(&root),
        Commands::Validate(args) => args.run(&root),
        Commands::Generate(args) => args.run(&root),
        Commands::Pipeline(args) => args.run(&root),
        Commands::Export(args) => args.run(&root),
        Commands::Clean(args) => args.run(&root),
        Commands::Rebuild(args) => args.run(&root),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(exit_code(&err));
    }
}
