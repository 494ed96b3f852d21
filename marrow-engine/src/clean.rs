//! The clean pass — delete skeleton files the index no longer references.
//!
//! Walks the skeleton root, removes every file whose path is not a
//! referenced skeleton path, then removes emptied directories deepest
//! first so chains of now-empty parents collapse. A missing skeleton root
//! is a no-op.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::info;
use walkdir::WalkDir;

use marrow_core::{index, paths};

use crate::error::{io_err, EngineError};

/// What one clean pass removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    pub files_removed: usize,
    pub dirs_removed: usize,
}

/// Run a clean pass at `root`.
pub fn run_at(root: &Path) -> Result<CleanOutcome, EngineError> {
    paths::ensure_initialized(root)?;
    let idx = index::load_at(&paths::index_path_at(root))?;

    let referenced: BTreeSet<PathBuf> = idx
        .files
        .values()
        .filter(|entry| !entry.skeleton_path.is_empty())
        .map(|entry| root.join(&entry.skeleton_path))
        .collect();

    let skeleton_dir = paths::skeleton_dir_at(root);
    if !skeleton_dir.is_dir() {
        return Ok(CleanOutcome::default());
    }

    let mut outcome = CleanOutcome::default();
    let mut dirs = Vec::new();

    for entry in WalkDir::new(&skeleton_dir).min_depth(1) {
        let entry = entry.map_err(marrow_scan::ScanError::from)?;
        if entry.file_type().is_dir() {
            dirs.push(entry.path().to_path_buf());
            continue;
        }
        if !referenced.contains(entry.path()) {
            match std::fs::remove_file(entry.path()) {
                Ok(()) => outcome.files_removed += 1,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(io_err(entry.path(), err)),
            }
        }
    }

    // Deepest first, so emptied parents collapse in one pass.
    dirs.sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
    for dir in dirs {
        // Fails on non-empty directories; that is the keep signal.
        if std::fs::remove_dir(&dir).is_ok() {
            outcome.dirs_removed += 1;
        }
    }

    info!(
        "clean: removed {} file(s), {} dir(s)",
        outcome.files_removed, outcome.dirs_removed
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use marrow_core::{config, skeleton};

    use super::*;

    fn init_workspace_with_sources(root: &Path, sources: &[&str]) {
        fs::create_dir_all(paths::skeleton_dir_at(root)).expect("mkdir");
        config::save_at(&config::default_config(), &paths::config_path_at(root))
            .expect("save config");
        for rel in sources {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, b"src").expect("write");
        }
        let mut idx =
            crate::sync::build_index_at(root, &config::default_config()).expect("build");
        index::save_at(&mut idx, &paths::index_path_at(root)).expect("save");
    }

    fn write_skeleton_file(root: &Path, rel_under_skeletons: &str) -> PathBuf {
        let full = paths::skeleton_dir_at(root).join(rel_under_skeletons);
        fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
        fs::write(&full, b"skeleton").expect("write");
        full
    }

    #[test]
    fn referenced_skeletons_survive_and_orphans_are_deleted() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with_sources(tmp.path(), &["src/app.go"]);

        let referenced = tmp
            .path()
            .join(skeleton::path_for_source("src/app.go"));
        fs::create_dir_all(referenced.parent().expect("parent")).expect("mkdir");
        fs::write(&referenced, b"keep").expect("write");
        let orphan = write_skeleton_file(tmp.path(), "legacy/old.skeleton.go");

        let outcome = run_at(tmp.path()).expect("clean");
        assert_eq!(outcome.files_removed, 1);
        assert!(referenced.exists());
        assert!(!orphan.exists());
    }

    #[test]
    fn emptied_directory_chains_collapse() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with_sources(tmp.path(), &[]);
        write_skeleton_file(tmp.path(), "a/b/c/deep.skeleton.ts");

        let outcome = run_at(tmp.path()).expect("clean");
        assert_eq!(outcome.files_removed, 1);
        assert_eq!(outcome.dirs_removed, 3);
        assert!(!paths::skeleton_dir_at(tmp.path()).join("a").exists());
    }

    #[test]
    fn missing_skeleton_root_is_a_no_op() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with_sources(tmp.path(), &[]);
        fs::remove_dir_all(paths::skeleton_dir_at(tmp.path())).expect("rm");

        let outcome = run_at(tmp.path()).expect("clean");
        assert_eq!(outcome, CleanOutcome::default());
    }
}
