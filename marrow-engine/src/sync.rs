//! The sync pass — one reconciliation of index against filesystem.
//!
//! Scan the tree, narrow to a candidate set, re-hash candidates, update
//! entries, drop entries whose sources are gone, persist. Running the
//! pass twice with no intervening filesystem change leaves the file map
//! byte-for-byte identical and reports zero changes on the second run.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::info;

use marrow_core::{config, index, paths, skeleton, FileEntry, Index, IndexStats, Status};
use marrow_scan::{classify, scan_files};

use crate::changeset;
use crate::error::{io_err, EngineError};

/// What one sync pass did.
#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    /// Total files the scanner saw.
    pub scanned: usize,
    /// Paths whose hash changed (marked stale).
    pub modified: Vec<String>,
    /// Paths newly tracked (marked missing).
    pub added: Vec<String>,
    /// Paths dropped because their source is gone.
    pub deleted: Vec<String>,
    /// Stats after the pass.
    pub stats: IndexStats,
}

impl SyncOutcome {
    /// Whether the pass changed the file map at all.
    pub fn changed(&self) -> bool {
        !self.modified.is_empty() || !self.added.is_empty() || !self.deleted.is_empty()
    }
}

/// Run one sync pass against the workspace at `root` and persist the index.
pub fn run_at(root: &Path, force_full: bool) -> Result<SyncOutcome, EngineError> {
    paths::ensure_initialized(root)?;
    let cfg = config::load_at(&paths::config_path_at(root))?;
    let index_path = paths::index_path_at(root);
    let mut idx = index::load_at(&index_path)?;

    let scanned = scan_files(root, &cfg)?;
    let outcome = reconcile(root, &mut idx, &scanned, force_full)?;

    idx.last_sync = Some(Utc::now());
    index::save_at(&mut idx, &index_path)?;

    info!(
        "sync: {} scanned, {} modified, {} added, {} deleted",
        outcome.scanned,
        outcome.modified.len(),
        outcome.added.len(),
        outcome.deleted.len()
    );
    Ok(SyncOutcome {
        stats: idx.stats,
        ..outcome
    })
}

/// Apply one reconciliation to `idx` in memory (no persistence).
fn reconcile(
    root: &Path,
    idx: &mut Index,
    scanned: &[String],
    force_full: bool,
) -> Result<SyncOutcome, EngineError> {
    let scanned_set: BTreeSet<&str> = scanned.iter().map(String::as_str).collect();
    let candidates = changeset::resolve(root, scanned, force_full, idx.last_sync);

    let mut modified = Vec::new();
    let mut added = Vec::new();

    for path in &candidates {
        // The resolver may return paths outside the scan (git output,
        // mtime walk); only the intersection is hashed.
        if !scanned_set.contains(path.as_str()) {
            continue;
        }
        let full = root.join(path);
        let meta = match std::fs::metadata(&full) {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(&full, err)),
        };
        let hash = marrow_core::hash::hash_file(&full)?;
        let mtime = file_mtime(&meta);

        match idx.files.get_mut(path) {
            None => {
                index::upsert(
                    idx,
                    path,
                    FileEntry {
                        path: path.clone(),
                        hash,
                        skeleton_hash: String::new(),
                        skeleton_path: skeleton::path_for_source(path),
                        last_modified: mtime,
                        status: Status::Missing,
                        kind: classify(path),
                        size: meta.len(),
                    },
                );
                added.push(path.clone());
            }
            Some(entry) => {
                if entry.hash != hash {
                    // Staleness means the skeleton is known out of date;
                    // skeleton_hash and skeleton_path are left alone.
                    entry.hash = hash;
                    entry.status = Status::Stale;
                    modified.push(path.clone());
                }
                entry.last_modified = mtime;
                entry.size = meta.len();
                entry.kind = classify(path);
                if entry.skeleton_path.is_empty() {
                    entry.skeleton_path = skeleton::path_for_source(path);
                }
            }
        }
    }

    // Sources that vanished take their entries with them, unconditionally.
    let deleted: Vec<String> = idx
        .files
        .keys()
        .filter(|path| !scanned_set.contains(path.as_str()))
        .cloned()
        .collect();
    for path in &deleted {
        index::remove(idx, path);
    }

    Ok(SyncOutcome {
        scanned: scanned.len(),
        modified,
        added,
        deleted,
        stats: index::calculate_stats(idx),
    })
}

/// Build a fresh index from a full scan + hash of every tracked file.
///
/// Every entry starts as `Missing` with no skeleton hash. Used by
/// `marrow init` and `marrow rebuild`; the caller persists the result.
pub fn build_index_at(root: &Path, cfg: &marrow_core::ScanConfig) -> Result<Index, EngineError> {
    let mut idx = index::new_index();
    idx.config = cfg.clone();

    for path in scan_files(root, cfg)? {
        let full = root.join(&path);
        let meta = std::fs::metadata(&full).map_err(|e| io_err(&full, e))?;
        let hash = marrow_core::hash::hash_file(&full)?;
        index::upsert(
            &mut idx,
            &path,
            FileEntry {
                path: path.clone(),
                hash,
                skeleton_hash: String::new(),
                skeleton_path: skeleton::path_for_source(&path),
                last_modified: file_mtime(&meta),
                status: Status::Missing,
                kind: classify(&path),
                size: meta.len(),
            },
        );
    }

    idx.last_sync = Some(Utc::now());
    idx.stats = index::calculate_stats(&idx);
    Ok(idx)
}

pub(crate) fn file_mtime(meta: &std::fs::Metadata) -> DateTime<Utc> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
