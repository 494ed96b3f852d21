//! `marrow init` — create the `.marrow/` data directory and track the tree.

use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use marrow_core::{config, index, paths};
use marrow_engine::build_index_at;

use super::{fs_error, user_error};

/// Prompt template seeded into `.marrow/skeleton-prompt.txt`. Users may
/// edit the file; `generate` reads it back from disk.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
# Skeleton Generation Prompt v2.1

Produce a structural skeleton for each source file listed below.

Rules:
- Keep the original language and file layout.
- Keep every exported type, constant, function, and method signature.
- Replace each body with a one-sentence summary comment.
- Keep doc comments on public items; drop implementation comments.
- Keep only the imports needed to understand the public surface.
- Do not invent symbols that are not present in the source.

Write each skeleton to the path given next to its source file.
";

/// Initialize skeleton tracking in the current directory.
#[derive(Args, Debug)]
pub struct InitArgs {}

impl InitArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        if paths::is_initialized(root) {
            return Err(user_error(format!(
                "'{}' is already initialized; use `marrow rebuild --confirm` to start over",
                root.display()
            )));
        }

        let skeleton_dir = paths::skeleton_dir_at(root);
        fs::create_dir_all(&skeleton_dir)
            .map_err(|err| fs_error(format!("cannot create '{}': {err}", skeleton_dir.display())))?;

        let cfg = config::default_config();
        config::save_at(&cfg, &paths::config_path_at(root))?;

        let prompt_path = paths::prompt_path_at(root);
        fs::write(&prompt_path, DEFAULT_PROMPT_TEMPLATE)
            .map_err(|err| fs_error(format!("cannot write '{}': {err}", prompt_path.display())))?;

        ensure_gitignore_entry(root)?;

        let mut idx = build_index_at(root, &cfg)?;
        index::save_at(&mut idx, &paths::index_path_at(root))?;

        println!(
            "{} Initialized skeleton tracking in {}",
            "✓".green(),
            paths::data_dir_at(root).display()
        );
        println!(
            "  {} source file(s) tracked, all awaiting generation",
            idx.stats.total_files
        );
        println!("  Next: `marrow generate` to build a regeneration prompt");
        Ok(())
    }
}

/// Append `.marrow/` to the workspace `.gitignore` unless already listed.
fn ensure_gitignore_entry(root: &Path) -> Result<()> {
    let path = root.join(".gitignore");
    let existing = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(err) => {
            return Err(fs_error(format!("cannot read '{}': {err}", path.display())));
        }
    };

    let entry = format!("{}/", paths::DATA_DIR);
    if existing.lines().any(|line| line.trim() == entry) {
        return Ok(());
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&entry);
    updated.push('\n');
    fs::write(&path, updated)
        .map_err(|err| fs_error(format!("cannot write '{}': {err}", path.display())))
}
