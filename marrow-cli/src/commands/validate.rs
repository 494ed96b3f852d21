//! `marrow validate` — audit the index against disk.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use marrow_engine::validate;

use super::data_error;

/// Arguments for `marrow validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Repair the index to match disk instead of only reporting.
    #[arg(long)]
    pub fix: bool,

    /// Exit with a data error when unrepaired issues remain.
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let outcome = validate::run_at(root, self.fix)?;

        for issue in &outcome.issues {
            if issue.resolved {
                println!("  {} {}: {}", "✔".green(), issue.path, issue.message);
            } else {
                println!("  {} {}: {}", "⚠".yellow(), issue.path, issue.message);
            }
        }

        let unresolved = outcome.unresolved();
        if outcome.issues.is_empty() {
            println!("{} Index is consistent with disk", "✓".green());
        } else if self.fix {
            println!(
                "{} {} issue(s) found, {} repaired ({} stale, {} missing, {} current, {} removed)",
                "✓".green(),
                outcome.issues.len(),
                outcome.issues.len() - unresolved,
                outcome.marked_stale,
                outcome.marked_missing,
                outcome.marked_current,
                outcome.removed
            );
        } else {
            println!(
                "{} {} issue(s) found — run `marrow validate --fix` to repair",
                "⚠".yellow(),
                outcome.issues.len()
            );
        }

        if self.strict && unresolved > 0 {
            return Err(data_error(format!(
                "{unresolved} unresolved validation issue(s)"
            )));
        }
        Ok(())
    }
}
