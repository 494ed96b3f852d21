//! Change-set resolution — which scanned files need re-hashing this pass.
//!
//! Policy, evaluated in order:
//! 1. Full-rescan override: every scanned file.
//! 2. Git work tree with a prior sync: union of modified-since-HEAD and
//!    untracked files. A git failure other than "not a repository", or an
//!    empty union, falls back to every scanned file.
//! 3. Otherwise: files whose mtime is newer than the last sync; an error
//!    or empty result falls back to every scanned file.
//!
//! Every fallback errs toward more work, never toward silently skipping a
//! changed file. The resolver itself never hashes and never fails.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::git::{self, GitError};

/// Resolve the candidate set for one sync pass.
///
/// `scanned` is the full current file set from the scanner; the result is
/// a subset of paths worth hashing (it may contain paths outside
/// `scanned`; the sync engine intersects).
pub fn resolve(
    root: &Path,
    scanned: &[String],
    force_full: bool,
    last_sync: Option<DateTime<Utc>>,
) -> BTreeSet<String> {
    if force_full {
        debug!("change-set: full rescan requested");
        return all_of(scanned);
    }

    if last_sync.is_some() && git::is_work_tree(root) {
        return resolve_from_git(root, scanned);
    }

    let Some(since) = last_sync else {
        debug!("change-set: no prior sync, taking all {} files", scanned.len());
        return all_of(scanned);
    };
    resolve_from_mtimes(root, scanned, since)
}

fn resolve_from_git(root: &Path, scanned: &[String]) -> BTreeSet<String> {
    let mut set = BTreeSet::new();

    match git::modified_since_head(root) {
        Ok(modified) => set.extend(modified),
        Err(GitError::NotARepository) => {}
        Err(err) => {
            // Fail safe, not silent: an unexpected git failure widens the
            // candidate set to everything.
            warn!("change-set: git diff failed ({err}), taking all files");
            return all_of(scanned);
        }
    }

    match git::untracked_files(root) {
        Ok(untracked) => set.extend(untracked),
        Err(err) => debug!("change-set: git ls-files failed ({err}), ignoring"),
    }

    if set.is_empty() {
        // Emptiness is inconclusive, not "nothing changed".
        debug!("change-set: git reported no candidates, taking all files");
        return all_of(scanned);
    }
    set
}

fn resolve_from_mtimes(root: &Path, scanned: &[String], since: DateTime<Utc>) -> BTreeSet<String> {
    match modified_after(root, since) {
        Ok(modified) if !modified.is_empty() => modified,
        Ok(_) => {
            debug!("change-set: mtime heuristic found nothing, taking all files");
            all_of(scanned)
        }
        Err(err) => {
            warn!("change-set: mtime walk failed ({err}), taking all files");
            all_of(scanned)
        }
    }
}

/// Files under `root` modified after `since`, as relative slash paths.
fn modified_after(root: &Path, since: DateTime<Utc>) -> Result<BTreeSet<String>, walkdir::Error> {
    let mut files = BTreeSet::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        let Ok(mtime) = meta.modified() else { continue };
        if DateTime::<Utc>::from(mtime) <= since {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root) {
            files.insert(rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"));
        }
    }
    Ok(files)
}

fn all_of(scanned: &[String]) -> BTreeSet<String> {
    scanned.iter().cloned().collect()
}
