//! `marrow export` — bundle current skeletons into one document.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use marrow_core::{index, paths, FileEntry, Status};

use super::{fs_error, user_error};

/// Arguments for `marrow export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format: markdown | json.
    #[arg(long, short = 'f', default_value = "markdown")]
    pub format: String,

    /// Write the export to a file instead of stdout.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument {
    generated_at: String,
    prompt_version: String,
    skeletons: Vec<ExportedSkeleton>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedSkeleton {
    path: String,
    skeleton_path: String,
    #[serde(rename = "type")]
    kind: String,
    content: String,
}

impl ExportArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        paths::ensure_initialized(root)?;
        let idx = index::load_at(&paths::index_path_at(root))?;

        // Only confirmed-current entries whose skeleton is actually on
        // disk are worth bundling.
        let mut skeletons = Vec::new();
        for entry in idx.files.values() {
            if entry.status != Status::Current || entry.skeleton_path.is_empty() {
                continue;
            }
            let full = root.join(&entry.skeleton_path);
            let content = match fs::read_to_string(&full) {
                Ok(content) => content,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(fs_error(format!(
                        "cannot read '{}': {err}",
                        full.display()
                    )));
                }
            };
            skeletons.push((entry, content));
        }
        if skeletons.is_empty() {
            return Err(user_error(
                "no current skeletons to export; run `marrow validate --fix` after generating",
            ));
        }

        let count = skeletons.len();
        let rendered = match self.format.to_ascii_lowercase().as_str() {
            "markdown" | "md" => render_markdown(&idx.prompt_version, &skeletons),
            "json" => render_json(&idx.prompt_version, skeletons)?,
            other => {
                return Err(user_error(format!(
                    "unknown format '{other}'; expected: markdown, json"
                )));
            }
        };

        match &self.output {
            Some(path) => {
                fs::write(path, &rendered).map_err(|err| {
                    fs_error(format!("cannot write '{}': {err}", path.display()))
                })?;
                eprintln!(
                    "{} Exported {} skeleton(s) to {}",
                    "✓".green(),
                    count,
                    path.display()
                );
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }
}

fn render_markdown(prompt_version: &str, skeletons: &[(&FileEntry, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Skeleton Export");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "Prompt version: {prompt_version}");

    for (entry, content) in skeletons {
        let _ = writeln!(out, "\n## {}", entry.path);
        if !entry.kind.is_empty() {
            let _ = writeln!(out, "\n- type: {}", entry.kind);
        }
        let _ = writeln!(out, "\n```\n{}\n```", content.trim_end_matches('\n'));
    }
    out
}

fn render_json(
    prompt_version: &str,
    skeletons: Vec<(&FileEntry, String)>,
) -> Result<String> {
    let doc = ExportDocument {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        prompt_version: prompt_version.to_string(),
        skeletons: skeletons
            .into_iter()
            .map(|(entry, content)| ExportedSkeleton {
                path: entry.path.clone(),
                skeleton_path: entry.skeleton_path.clone(),
                kind: entry.kind.clone(),
                content,
            })
            .collect(),
    };
    let mut rendered = serde_json::to_string_pretty(&doc)?;
    rendered.push('\n');
    Ok(rendered)
}
