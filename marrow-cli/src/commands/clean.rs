//! `marrow clean` — sweep unreferenced skeleton files.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use marrow_engine::clean;

/// Arguments for `marrow clean`.
#[derive(Args, Debug)]
pub struct CleanArgs {}

impl CleanArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let outcome = clean::run_at(root)?;
        if outcome.files_removed == 0 && outcome.dirs_removed == 0 {
            println!("{} No orphaned skeletons", "✓".green());
        } else {
            println!(
                "{} Removed {} orphaned skeleton(s) and {} empty director(ies)",
                "✓".green(),
                outcome.files_removed,
                outcome.dirs_removed
            );
        }
        Ok(())
    }
}
