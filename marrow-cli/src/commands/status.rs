//! `marrow status` — index freshness at a glance.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use marrow_core::{index, paths, Index, Status};

/// Arguments for `marrow status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit the full index as machine-readable JSON.
    #[arg(long)]
    pub json: bool,

    /// List every file that is not current.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl StatusArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        paths::ensure_initialized(root)?;
        let idx = index::load_at(&paths::index_path_at(root))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&idx)?);
            return Ok(());
        }

        print_overview(&idx);
        if self.verbose {
            print_attention_table(&idx);
        }
        Ok(())
    }
}

fn print_overview(idx: &Index) {
    let stats = &idx.stats;
    println!("Tracked files:  {}", stats.total_files);
    println!(
        "Status:         {} current, {} stale, {} missing, {} pending",
        stats.current.to_string().green(),
        stats.stale.to_string().yellow(),
        stats.missing.to_string().red(),
        stats.pending_generation.to_string().blue()
    );
    println!("Last sync:      {}", format_age(idx.last_sync));
    println!("Prompt version: {}", idx.prompt_version);

    let behind = stats.stale + stats.missing + stats.pending_generation;
    if behind == 0 && stats.total_files > 0 {
        println!("{} All skeletons are up to date", "✓".green());
    } else if behind > 0 {
        println!(
            "{} {} file(s) need regeneration — run `marrow generate`",
            "⚠".yellow(),
            behind
        );
    }
}

#[derive(Tabled)]
struct AttentionRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "type")]
    kind: String,
}

fn print_attention_table(idx: &Index) {
    let rows: Vec<AttentionRow> = idx
        .files
        .values()
        .filter(|entry| entry.status != Status::Current)
        .map(|entry| AttentionRow {
            file: entry.path.clone(),
            status: entry.status.to_string(),
            kind: entry.kind.clone(),
        })
        .collect();

    if rows.is_empty() {
        return;
    }
    println!();
    println!("{}", Table::new(rows).with(Style::sharp()));
}

/// Human-readable age for the last sync timestamp.
fn format_age(at: Option<DateTime<Utc>>) -> String {
    let Some(at) = at else {
        return "never".to_string();
    };
    let elapsed = Utc::now().signed_duration_since(at);
    let formatted = at.format("%Y-%m-%d %H:%M UTC");
    if elapsed.num_seconds() < 60 {
        format!("{formatted} (just now)")
    } else if elapsed.num_minutes() < 60 {
        format!("{formatted} ({}m ago)", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{formatted} ({}h ago)", elapsed.num_hours())
    } else {
        format!("{formatted} ({}d ago)", elapsed.num_days())
    }
}
