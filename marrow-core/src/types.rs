//! Domain types for the marrow index.
//!
//! All types serialize through serde + serde_json with camelCase field
//! names so the persisted `index.json` stays stable across versions.
//! `Index.files` is a `BTreeMap` keyed by slash-normalized relative path,
//! giving deterministic serialization order.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status lifecycle
// ---------------------------------------------------------------------------

/// Synchronization state of a tracked file's skeleton.
///
/// Lifecycle: a file enters the index as `Missing`, becomes `Stale` when
/// its source hash drifts, `PendingGeneration` when flagged for
/// regeneration, and `Current` only through the validator's promotion
/// rule. Entries are deleted outright when the source file disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    Current,
    Stale,
    #[default]
    Missing,
    PendingGeneration,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Current => write!(f, "current"),
            Status::Stale => write!(f, "stale"),
            Status::Missing => write!(f, "missing"),
            Status::PendingGeneration => write!(f, "pending generation"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A single tracked source file within the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Slash-normalized path relative to the workspace root (unique key).
    pub path: String,
    /// SHA-256 hex digest of the source bytes.
    pub hash: String,
    /// SHA-256 hex digest of the last-confirmed skeleton bytes; empty
    /// until the validator first captures one.
    #[serde(default)]
    pub skeleton_hash: String,
    /// Relative skeleton path; always derivable from `path`.
    #[serde(default)]
    pub skeleton_path: String,
    pub last_modified: DateTime<Utc>,
    pub status: Status,
    /// Classification label (`service`, `controller`, …) or empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub size: u64,
}

/// Counts of files by status, always derived from `Index.files`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_files: usize,
    pub current: usize,
    pub stale: usize,
    pub missing: usize,
    pub pending_generation: usize,
}

/// User configuration for scanning behavior, stored in `.marrow/config.json`
/// and embedded in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    /// Extensions to track, with leading dot (`.ts`). Empty = everything.
    #[serde(default)]
    pub included_extensions: Vec<String>,
    /// Glob patterns excluded from scanning, tested against the full
    /// relative path and each path segment.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    #[serde(default)]
    pub skeleton_prompt_version: String,
    #[serde(default)]
    pub root_path: String,
}

/// Root structure persisted as `index.json`.
///
/// `stats` is a pure projection over `files`: it is recomputed on every
/// load and save and never trusted as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Index {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub prompt_version: String,
    /// `None` until the first sync pass completes.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config: ScanConfig,
    #[serde(default)]
    pub files: BTreeMap<String, FileEntry>,
    #[serde(default)]
    pub stats: IndexStats,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_camel_case() {
        let json = serde_json::to_string(&Status::PendingGeneration).expect("serialize");
        assert_eq!(json, "\"pendingGeneration\"");
        let back: Status = serde_json::from_str("\"stale\"").expect("deserialize");
        assert_eq!(back, Status::Stale);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Current.to_string(), "current");
        assert_eq!(Status::PendingGeneration.to_string(), "pending generation");
    }

    #[test]
    fn file_entry_type_field_round_trips() {
        let entry = FileEntry {
            path: "src/app.go".into(),
            hash: "deadbeef".into(),
            skeleton_hash: String::new(),
            skeleton_path: ".marrow/skeletons/src/app.skeleton.go".into(),
            last_modified: Utc::now(),
            status: Status::Missing,
            kind: "service".into(),
            size: 42,
        };
        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("\"type\":\"service\""));
        assert!(json.contains("\"skeletonHash\""));
        let back: FileEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, entry);
    }

    #[test]
    fn index_defaults_from_empty_document() {
        let idx: Index = serde_json::from_str("{}").expect("deserialize");
        assert!(idx.files.is_empty());
        assert!(idx.last_sync.is_none());
        assert_eq!(idx.stats.total_files, 0);
    }
}
