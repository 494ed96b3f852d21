//! Index store — persisted map from source path to [`FileEntry`].
//!
//! Writes use an atomic `.tmp` + rename flow so a crash mid-write can
//! never leave a half-written `index.json` readable as valid. `stats` is
//! recomputed from `files` on every load and every save; whatever counts
//! the document carried are discarded.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::error::{io_err, CoreError};
use crate::types::{FileEntry, Index, IndexStats, Status};

/// Schema version written to a new index.
pub const INDEX_VERSION: &str = "1.0.0";

/// A fresh index with defaults, an empty file map, and no sync timestamp.
pub fn new_index() -> Index {
    Index {
        version: INDEX_VERSION.to_string(),
        prompt_version: crate::config::DEFAULT_PROMPT_VERSION.to_string(),
        last_sync: None,
        config: crate::config::default_config(),
        files: Default::default(),
        stats: IndexStats::default(),
    }
}

/// Load the index at `path`.
///
/// Absent fields are normalized to schema defaults and `stats` is
/// recomputed from `files`. A missing file is a data error (the workspace
/// exists but its index is gone); malformed JSON is a data error too.
pub fn load_at(path: &Path) -> Result<Index, CoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(CoreError::MissingDataFile {
                path: path.to_path_buf(),
            })
        }
        Err(err) => return Err(io_err(path, err)),
    };
    let mut idx: Index = serde_json::from_str(&contents).map_err(|e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    normalize(&mut idx);
    idx.stats = calculate_stats(&idx);
    Ok(idx)
}

/// Atomically save the index to `path`, recomputing `stats` first.
pub fn save_at(idx: &mut Index, path: &Path) -> Result<(), CoreError> {
    normalize(idx);
    idx.stats = calculate_stats(idx);
    write_json_atomic(path, idx)
}

/// Upsert a file entry, keying it by `path`.
pub fn upsert(idx: &mut Index, path: &str, mut entry: FileEntry) {
    entry.path = path.to_string();
    idx.files.insert(path.to_string(), entry);
}

/// Remove a file entry if present.
pub fn remove(idx: &mut Index, path: &str) {
    idx.files.remove(path);
}

/// Flip the named entries to [`Status::PendingGeneration`].
///
/// This is the external-request path of the entry lifecycle: callers have
/// asked for these skeletons to be regenerated. Unknown paths are ignored.
pub fn mark_pending(idx: &mut Index, paths: &[String]) {
    for path in paths {
        if let Some(entry) = idx.files.get_mut(path) {
            entry.status = Status::PendingGeneration;
            if entry.skeleton_path.is_empty() {
                entry.skeleton_path = crate::skeleton::path_for_source(path);
            }
        }
    }
}

/// Pure O(n) projection of per-status counts over `files`.
pub fn calculate_stats(idx: &Index) -> IndexStats {
    let mut stats = IndexStats::default();
    for entry in idx.files.values() {
        stats.total_files += 1;
        match entry.status {
            Status::Current => stats.current += 1,
            Status::Stale => stats.stale += 1,
            Status::Missing => stats.missing += 1,
            Status::PendingGeneration => stats.pending_generation += 1,
        }
    }
    stats
}

/// Serialize `value` as pretty JSON and write it via `.tmp` + rename.
///
/// The `.tmp` sibling lives in the target directory, so the rename never
/// crosses filesystems.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), CoreError> {
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("path has no parent")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

fn normalize(idx: &mut Index) {
    if idx.version.is_empty() {
        idx.version = INDEX_VERSION.to_string();
    }
    if idx.prompt_version.is_empty() {
        idx.prompt_version = crate::config::DEFAULT_PROMPT_VERSION.to_string();
    }
    if idx.config.skeleton_prompt_version.is_empty() {
        idx.config.skeleton_prompt_version = idx.prompt_version.clone();
    }
    if let Some(ts) = idx.last_sync {
        idx.last_sync = Some(ts.with_timezone(&Utc));
    }
}
