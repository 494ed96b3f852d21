//! `marrow generate` — build a regeneration prompt for out-of-date files.
//!
//! Writes the prompt (template + per-file sections with source contents)
//! to stdout or `--output`, then marks every selected file
//! `pendingGeneration` so the next fix-mode validation can promote it
//! once its skeleton lands.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use marrow_core::{index, paths, Index, Status};

use super::{fs_error, init::DEFAULT_PROMPT_TEMPLATE, user_error};

/// Arguments for `marrow generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Comma-separated statuses to select: current, stale, missing, pending.
    #[arg(long, default_value = "stale,missing")]
    pub filter: String,

    /// Explicit tracked paths to select instead of filtering by status.
    #[arg(long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Write the prompt to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        paths::ensure_initialized(root)?;
        let index_path = paths::index_path_at(root);
        let mut idx = index::load_at(&index_path)?;

        let selected = self.select(&idx)?;
        let prompt = build_prompt(root, &idx, &selected)?;

        match &self.output {
            Some(path) => {
                fs::write(path, &prompt).map_err(|err| {
                    fs_error(format!("cannot write '{}': {err}", path.display()))
                })?;
                eprintln!(
                    "{} Wrote prompt for {} file(s) to {}",
                    "✓".green(),
                    selected.len(),
                    path.display()
                );
            }
            None => print!("{prompt}"),
        }

        index::mark_pending(&mut idx, &selected);
        index::save_at(&mut idx, &index_path)?;
        eprintln!(
            "{} Marked {} file(s) as pending generation",
            "✓".green(),
            selected.len()
        );
        Ok(())
    }

    /// Resolve the selection: explicit `--files` (every path must be
    /// tracked and within the status filter), otherwise all entries
    /// matching `--filter`.
    fn select(&self, idx: &Index) -> Result<Vec<String>> {
        let statuses = parse_filter(&self.filter)?;

        if !self.files.is_empty() {
            for path in &self.files {
                let Some(entry) = idx.files.get(path) else {
                    return Err(user_error(format!(
                        "'{path}' is not tracked; run `marrow sync` first"
                    )));
                };
                if !statuses.contains(&entry.status) {
                    return Err(user_error(format!(
                        "'{path}' is {}, outside --filter '{}'",
                        entry.status, self.filter
                    )));
                }
            }
            return Ok(self.files.clone());
        }

        let selected: Vec<String> = idx
            .files
            .values()
            .filter(|entry| statuses.contains(&entry.status))
            .map(|entry| entry.path.clone())
            .collect();
        if selected.is_empty() {
            return Err(user_error(format!(
                "no tracked files match filter '{}'",
                self.filter
            )));
        }
        Ok(selected)
    }
}

fn parse_filter(filter: &str) -> Result<Vec<Status>> {
    let mut statuses = Vec::new();
    for token in filter.split(',') {
        let status = match token.trim().to_ascii_lowercase().as_str() {
            "current" => Status::Current,
            "stale" => Status::Stale,
            "missing" => Status::Missing,
            "pending" => Status::PendingGeneration,
            "" => continue,
            other => {
                return Err(user_error(format!(
                    "unknown status '{other}' in --filter; expected: current, stale, missing, pending"
                )));
            }
        };
        if !statuses.contains(&status) {
            statuses.push(status);
        }
    }
    if statuses.is_empty() {
        return Err(user_error("--filter selected no statuses"));
    }
    Ok(statuses)
}

fn build_prompt(root: &Path, idx: &Index, selected: &[String]) -> Result<String> {
    let template = load_template(root)?;
    let mut out = template;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "\n## Files ({})", selected.len());

    for path in selected {
        // Selection guarantees the entry exists.
        let Some(entry) = idx.files.get(path) else {
            continue;
        };
        let source = fs::read_to_string(root.join(path))
            .map_err(|err| fs_error(format!("cannot read '{path}': {err}")))?;
        let _ = writeln!(out, "\n### {path}");
        let _ = writeln!(out, "- type: {}", entry.kind);
        let _ = writeln!(out, "- status: {}", entry.status);
        let _ = writeln!(out, "- skeleton: {}", entry.skeleton_path);
        let _ = writeln!(out, "\n```\n{}\n```", source.trim_end_matches('\n'));
    }
    Ok(out)
}

/// The on-disk template if present, the built-in default otherwise.
fn load_template(root: &Path) -> Result<String> {
    let path = paths::prompt_path_at(root);
    match fs::read_to_string(&path) {
        Ok(template) => Ok(template),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Ok(DEFAULT_PROMPT_TEMPLATE.to_string())
        }
        Err(err) => Err(fs_error(format!("cannot read '{}': {err}", path.display()))),
    }
}
