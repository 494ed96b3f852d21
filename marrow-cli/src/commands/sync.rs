//! `marrow sync` — reconcile the index against the source tree.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use marrow_core::IndexStats;
use marrow_engine::sync;

/// Arguments for `marrow sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Re-hash every tracked file instead of only the changed ones.
    #[arg(long)]
    pub full: bool,

    /// List each added, modified, and deleted path.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl SyncArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let outcome = sync::run_at(root, self.full)?;

        if !outcome.changed() {
            println!(
                "{} Nothing to do — {} file(s) scanned, index unchanged",
                "✓".green(),
                outcome.scanned
            );
            print_stats_line(&outcome.stats);
            return Ok(());
        }

        println!(
            "{} Synced {} file(s): {} added, {} modified, {} deleted",
            "✓".green(),
            outcome.scanned,
            outcome.added.len(),
            outcome.modified.len(),
            outcome.deleted.len()
        );
        if self.verbose {
            for path in &outcome.added {
                println!("  {} {path}", "+".green());
            }
            for path in &outcome.modified {
                println!("  {} {path}", "~".yellow());
            }
            for path in &outcome.deleted {
                println!("  {} {path}", "-".red());
            }
        }
        print_stats_line(&outcome.stats);
        Ok(())
    }
}

fn print_stats_line(stats: &IndexStats) {
    println!(
        "  {} current, {} stale, {} missing, {} pending",
        stats.current.to_string().green(),
        stats.stale.to_string().yellow(),
        stats.missing.to_string().red(),
        stats.pending_generation.to_string().blue()
    );
}
