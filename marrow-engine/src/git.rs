//! Subprocess-based git queries.
//!
//! Exactly three operations, all synchronous and all optional inputs to
//! the change-set resolver: whether the root is inside a work tree, which
//! tracked files changed since HEAD, and which files git does not know
//! about. Failure here never aborts a pass — the resolver degrades to a
//! coarser heuristic instead.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Errors from git queries.
#[derive(Debug, Error)]
pub enum GitError {
    /// The root is not inside a git work tree (or git is unavailable).
    #[error("not a git repository")]
    NotARepository,

    /// Git ran but exited nonzero.
    #[error("git {args}: {message}")]
    Command { args: String, message: String },
}

/// Whether `root` resides inside a git work tree.
///
/// A spawn failure (git not installed) reads as `false`; callers fall
/// back to the timestamp heuristic in that case.
pub fn is_work_tree(root: &Path) -> bool {
    match run_git(root, &["rev-parse", "--is-inside-work-tree"]) {
        Ok(output) => output.trim() == "true",
        Err(_) => false,
    }
}

/// Tracked files modified relative to the last commit.
pub fn modified_since_head(root: &Path) -> Result<Vec<String>, GitError> {
    if !is_work_tree(root) {
        return Err(GitError::NotARepository);
    }
    run_git(root, &["diff", "--name-only", "HEAD"]).map(parse_list)
}

/// Files present but unknown to git, honoring ignore rules.
pub fn untracked_files(root: &Path) -> Result<Vec<String>, GitError> {
    if !is_work_tree(root) {
        return Err(GitError::NotARepository);
    }
    run_git(root, &["ls-files", "--others", "--exclude-standard"]).map(parse_list)
}

fn run_git(root: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .map_err(|err| GitError::Command {
            args: args.join(" "),
            message: err.to_string(),
        })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(GitError::Command {
            args: args.join(" "),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn parse_list(output: String) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
