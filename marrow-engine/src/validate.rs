//! The validate pass — exhaustive audit and self-heal.
//!
//! Unlike sync, validation deliberately bypasses the change-set heuristic:
//! every entry's source is re-hashed unconditionally, because the
//! correctness guarantees here require exhaustiveness. Checks per entry,
//! in order: source existence, source hash, skeleton existence, skeleton
//! hash, and (fix mode only) the promotion rule — the single path by
//! which an entry becomes `Current`.
//!
//! Fixed point: a second `--fix` run over an unchanged filesystem reports
//! zero issues. An entry already recorded as missing-skeleton (status
//! `Missing`, empty skeleton hash) therefore raises no issue while the
//! skeleton stays absent — the index agrees with reality.

use std::path::Path;

use marrow_core::{index, paths, skeleton, Status};

use crate::error::{io_err, EngineError};
use crate::sync::file_mtime;

/// One discrepancy found during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
    /// Whether fix mode repaired it in this pass.
    pub resolved: bool,
}

/// What one validate pass found and did.
#[derive(Debug, Clone, Default)]
pub struct ValidateOutcome {
    pub issues: Vec<Issue>,
    pub marked_stale: usize,
    pub marked_missing: usize,
    pub marked_current: usize,
    pub removed: usize,
}

impl ValidateOutcome {
    pub fn unresolved(&self) -> usize {
        self.issues.iter().filter(|i| !i.resolved).count()
    }
}

/// Run a validate pass at `root`; persist the index only in fix mode and
/// only when something changed.
pub fn run_at(root: &Path, fix: bool) -> Result<ValidateOutcome, EngineError> {
    paths::ensure_initialized(root)?;
    let index_path = paths::index_path_at(root);
    let mut idx = index::load_at(&index_path)?;

    let mut outcome = ValidateOutcome::default();
    let mut remove_paths = Vec::new();
    let mut changed = false;

    let entry_paths: Vec<String> = idx.files.keys().cloned().collect();
    for path in entry_paths {
        let mut entry = idx.files[&path].clone();
        let source = root.join(&path);

        // a. Source existence — a vanished source invalidates the entry.
        let meta = match std::fs::metadata(&source) {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if fix {
                    remove_paths.push(path.clone());
                    outcome.removed += 1;
                    changed = true;
                    outcome.issues.push(Issue {
                        path,
                        message: "source file missing (removed from index)".to_string(),
                        resolved: true,
                    });
                } else {
                    outcome.issues.push(Issue {
                        path,
                        message: "source file missing".to_string(),
                        resolved: false,
                    });
                }
                continue;
            }
            Err(err) => return Err(io_err(&source, err)),
        };

        // b. Source hash.
        let current_hash = marrow_core::hash::hash_file(&source)?;
        let hash_changed = current_hash != entry.hash;
        if hash_changed {
            if fix {
                entry.hash = current_hash;
                entry.last_modified = file_mtime(&meta);
                entry.size = meta.len();
                entry.status = Status::Stale;
                outcome.marked_stale += 1;
                changed = true;
                outcome.issues.push(Issue {
                    path: path.clone(),
                    message: "source hash mismatch (marked stale)".to_string(),
                    resolved: true,
                });
            } else {
                outcome.issues.push(Issue {
                    path: path.clone(),
                    message: "source hash mismatch".to_string(),
                    resolved: false,
                });
            }
        }

        if entry.skeleton_path.is_empty() {
            entry.skeleton_path = skeleton::path_for_source(&path);
        }
        let skeleton_full = root.join(&entry.skeleton_path);

        if !skeleton_full.exists() {
            // c. Skeleton existence. Only a discrepancy while the index
            // still claims otherwise; once recorded, silence keeps the
            // fixed point.
            if entry.status != Status::Missing || !entry.skeleton_hash.is_empty() {
                if fix {
                    entry.status = Status::Missing;
                    entry.skeleton_hash.clear();
                    outcome.marked_missing += 1;
                    changed = true;
                    outcome.issues.push(Issue {
                        path: path.clone(),
                        message: "skeleton file missing (marked missing)".to_string(),
                        resolved: true,
                    });
                } else {
                    outcome.issues.push(Issue {
                        path: path.clone(),
                        message: "skeleton file missing".to_string(),
                        resolved: false,
                    });
                }
            }
        } else {
            // d. Skeleton hash.
            let skeleton_hash = marrow_core::hash::hash_file(&skeleton_full)?;
            let mut adopted = false;

            if entry.skeleton_hash.is_empty() {
                // First capture, not a discrepancy: adopt silently.
                if fix {
                    entry.skeleton_hash = skeleton_hash;
                    adopted = true;
                    changed = true;
                }
            } else if entry.skeleton_hash != skeleton_hash {
                if fix {
                    entry.skeleton_hash = skeleton_hash;
                    adopted = true;
                    changed = true;
                    outcome.issues.push(Issue {
                        path: path.clone(),
                        message: "skeleton hash mismatch (skeleton hash updated)".to_string(),
                        resolved: true,
                    });
                } else {
                    outcome.issues.push(Issue {
                        path: path.clone(),
                        message: "skeleton hash mismatch".to_string(),
                        resolved: false,
                    });
                }
            }

            // e. Promotion — the only path to `Current`.
            if fix
                && !hash_changed
                && !entry.skeleton_hash.is_empty()
                && entry.status != Status::Missing
                && (entry.status == Status::PendingGeneration || adopted)
                && entry.status != Status::Current
            {
                entry.status = Status::Current;
                outcome.marked_current += 1;
                changed = true;
            }
        }

        if fix {
            index::upsert(&mut idx, &path, entry);
        }
    }

    for path in &remove_paths {
        index::remove(&mut idx, path);
    }

    if fix && changed {
        index::save_at(&mut idx, &index_path)?;
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use marrow_core::{config, FileEntry};

    use super::*;

    fn init_workspace_with(root: &Path, sources: &[(&str, &[u8])]) {
        fs::create_dir_all(paths::skeleton_dir_at(root)).expect("mkdir");
        config::save_at(&config::default_config(), &paths::config_path_at(root))
            .expect("save config");
        for (rel, contents) in sources {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
            fs::write(&path, contents).expect("write");
        }
        let mut idx =
            crate::sync::build_index_at(root, &config::default_config()).expect("build");
        index::save_at(&mut idx, &paths::index_path_at(root)).expect("save");
    }

    fn write_skeleton(root: &Path, source_rel: &str, contents: &[u8]) -> String {
        let rel = skeleton::path_for_source(source_rel);
        let full = root.join(&rel);
        fs::create_dir_all(full.parent().expect("parent")).expect("mkdir");
        fs::write(&full, contents).expect("write skeleton");
        rel
    }

    fn set_entry<F: FnOnce(&mut FileEntry)>(root: &Path, rel: &str, mutate: F) {
        let index_path = paths::index_path_at(root);
        let mut idx = index::load_at(&index_path).expect("load");
        mutate(idx.files.get_mut(rel).expect("entry"));
        index::save_at(&mut idx, &index_path).expect("save");
    }

    #[test]
    fn audit_mode_reports_without_mutating() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("app.go", b"v1")]);
        fs::write(tmp.path().join("app.go"), b"v2").expect("edit");

        let before = index::load_at(&paths::index_path_at(tmp.path())).expect("load");
        let outcome = run_at(tmp.path(), false).expect("validate");
        let after = index::load_at(&paths::index_path_at(tmp.path())).expect("load");

        assert_eq!(outcome.unresolved(), outcome.issues.len());
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.message.contains("source hash mismatch")));
        assert_eq!(before.files, after.files, "audit must not mutate");
    }

    #[test]
    fn fix_mode_marks_edited_source_stale() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("app.go", b"v1")]);
        write_skeleton(tmp.path(), "app.go", b"skeleton v1");
        fs::write(tmp.path().join("app.go"), b"v2").expect("edit");

        let outcome = run_at(tmp.path(), true).expect("validate");
        assert_eq!(outcome.marked_stale, 1);

        let idx = index::load_at(&paths::index_path_at(tmp.path())).expect("load");
        assert_eq!(idx.files["app.go"].status, Status::Stale);
        assert_eq!(
            idx.files["app.go"].hash,
            marrow_core::hash::hash_bytes(b"v2")
        );
    }

    #[test]
    fn fix_mode_removes_entries_for_vanished_sources() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("gone.go", b"x"), ("kept.go", b"y")]);
        fs::remove_file(tmp.path().join("gone.go")).expect("remove");

        let outcome = run_at(tmp.path(), true).expect("validate");
        assert_eq!(outcome.removed, 1);

        let idx = index::load_at(&paths::index_path_at(tmp.path())).expect("load");
        assert!(!idx.files.contains_key("gone.go"));
        assert!(idx.files.contains_key("kept.go"));
    }

    #[test]
    fn pending_entry_with_fresh_skeleton_is_promoted_to_current() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("app.go", b"v1")]);
        write_skeleton(tmp.path(), "app.go", b"skeleton");
        set_entry(tmp.path(), "app.go", |e| e.status = Status::PendingGeneration);

        let outcome = run_at(tmp.path(), true).expect("validate");
        assert_eq!(outcome.marked_current, 1);

        let idx = index::load_at(&paths::index_path_at(tmp.path())).expect("load");
        let entry = &idx.files["app.go"];
        assert_eq!(entry.status, Status::Current);
        assert_eq!(
            entry.skeleton_hash,
            marrow_core::hash::hash_bytes(b"skeleton")
        );
    }

    #[test]
    fn regenerated_skeleton_is_adopted_and_promoted() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("app.go", b"v1")]);
        write_skeleton(tmp.path(), "app.go", b"skeleton v1");
        run_at(tmp.path(), true).expect("first fix adopts");

        write_skeleton(tmp.path(), "app.go", b"skeleton v2");
        set_entry(tmp.path(), "app.go", |e| e.status = Status::Stale);

        let outcome = run_at(tmp.path(), true).expect("validate");
        assert!(outcome
            .issues
            .iter()
            .any(|i| i.resolved && i.message.contains("skeleton hash mismatch")));

        let idx = index::load_at(&paths::index_path_at(tmp.path())).expect("load");
        assert_eq!(idx.files["app.go"].status, Status::Current);
    }

    #[test]
    fn missing_skeleton_clears_hash_and_raises_no_issue_once_recorded() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("app.go", b"v1")]);
        set_entry(tmp.path(), "app.go", |e| {
            e.status = Status::Current;
            e.skeleton_hash = "cafebabe".to_string();
        });

        let first = run_at(tmp.path(), true).expect("validate");
        assert_eq!(first.marked_missing, 1);

        let second = run_at(tmp.path(), true).expect("validate");
        assert!(second.issues.is_empty(), "index now agrees with reality");
    }

    #[test]
    fn fix_reaches_a_fixed_point_in_one_pass() {
        let tmp = TempDir::new().expect("tempdir");
        init_workspace_with(tmp.path(), &[("a.go", b"a"), ("b/c.go", b"c")]);
        write_skeleton(tmp.path(), "a.go", b"skeleton a");
        fs::write(tmp.path().join("a.go"), b"edited").expect("edit");
        fs::remove_file(tmp.path().join("b/c.go")).expect("remove");

        let first = run_at(tmp.path(), true).expect("first fix");
        assert!(!first.issues.is_empty());

        let second = run_at(tmp.path(), true).expect("second fix");
        assert!(second.issues.is_empty(), "second --fix must be clean");
        assert_eq!(second.marked_stale + second.marked_missing + second.removed, 0);
    }
}
