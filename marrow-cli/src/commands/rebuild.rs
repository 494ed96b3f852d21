//! `marrow rebuild` — discard the index and skeletons, re-track from scratch.

use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use marrow_core::{config, index, paths};
use marrow_engine::build_index_at;

use super::{fs_error, user_error};

/// Arguments for `marrow rebuild`.
#[derive(Args, Debug)]
pub struct RebuildArgs {
    /// Acknowledge that the index and every skeleton will be deleted.
    #[arg(long)]
    pub confirm: bool,
}

impl RebuildArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        paths::ensure_initialized(root)?;
        if !self.confirm {
            return Err(user_error(
                "rebuild deletes the index and every skeleton; pass --confirm to proceed",
            ));
        }

        let skeleton_dir = paths::skeleton_dir_at(root);
        if skeleton_dir.is_dir() {
            fs::remove_dir_all(&skeleton_dir).map_err(|err| {
                fs_error(format!("cannot remove '{}': {err}", skeleton_dir.display()))
            })?;
        }
        fs::create_dir_all(&skeleton_dir)
            .map_err(|err| fs_error(format!("cannot create '{}': {err}", skeleton_dir.display())))?;

        // Config and prompt template survive a rebuild.
        let cfg = config::load_at(&paths::config_path_at(root))?;
        let mut idx = build_index_at(root, &cfg)?;
        index::save_at(&mut idx, &paths::index_path_at(root))?;

        println!(
            "{} Rebuilt index: {} file(s) tracked, all awaiting generation",
            "✓".green(),
            idx.stats.total_files
        );
        Ok(())
    }
}
