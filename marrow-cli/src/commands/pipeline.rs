//! `marrow pipeline` — sync then generate in one step.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use super::{generate::GenerateArgs, sync::SyncArgs};

/// Arguments for `marrow pipeline`.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Re-hash every tracked file instead of only the changed ones.
    #[arg(long)]
    pub full: bool,

    /// List each added, modified, and deleted path during the sync step.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Comma-separated statuses to select: current, stale, missing, pending.
    #[arg(long, default_value = "stale,missing")]
    pub filter: String,

    /// Explicit tracked paths to select instead of filtering by status.
    #[arg(long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Write the prompt to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl PipelineArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        SyncArgs {
            full: self.full,
            verbose: self.verbose,
        }
        .run(root)?;

        GenerateArgs {
            filter: self.filter,
            files: self.files,
            output: self.output,
        }
        .run(root)
    }
}
