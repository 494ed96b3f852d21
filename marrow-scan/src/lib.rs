//! File scanning and classification for marrow.
//!
//! `scan_files` walks a workspace root, applies the configured
//! include/exclude rules, and returns a sorted list of slash-normalized
//! relative paths. `classify` labels a path by matching it against an
//! ordered pattern table.
//!
//! # Classification priority
//!
//! When a path matches more than one category, the first match in this
//! fixed order wins: `controller`, `service`, `repository`, `middleware`,
//! `dto`, `model`, `config`, `util`. Specific role names are checked
//! before loose ones, with `util` last as the weakest match.

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use thiserror::Error;
use walkdir::WalkDir;

use marrow_core::{ErrorKind, ScanConfig};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Walk failure (unreadable directory, dangling link loop, …).
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured exclude pattern is not valid glob syntax.
    #[error("invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

impl ScanError {
    /// Classify this error for exit-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::Walk(_) | ScanError::Io { .. } => ErrorKind::Filesystem,
            ScanError::Pattern { .. } => ErrorKind::User,
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Walk `root` and return the sorted relative paths of all tracked files.
///
/// A path is excluded when any configured pattern matches either the full
/// relative path or one of its segments; an excluded directory prunes its
/// whole subtree without descending. A file is kept only if its extension
/// (case-insensitive) is in `included_extensions`, or that list is empty.
pub fn scan_files(root: &Path, cfg: &ScanConfig) -> Result<Vec<String>, ScanError> {
    let excludes = compile_patterns(&cfg.excluded_paths)?;

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            let rel = match entry.path().strip_prefix(root) {
                Ok(rel) => to_slash(rel),
                Err(_) => return true,
            };
            !is_excluded(&rel, &excludes)
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => to_slash(rel),
            Err(_) => continue,
        };
        if !include_by_extension(&rel, &cfg.included_extensions) {
            continue;
        }
        files.push(rel);
    }

    files.sort();
    Ok(files)
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<GlobMatcher>, ScanError> {
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .map(|pattern| {
            // `*` stays within one segment; `**` crosses segments.
            GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map(|glob| glob.compile_matcher())
                .map_err(|source| ScanError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
        })
        .collect()
}

fn is_excluded(rel: &str, excludes: &[GlobMatcher]) -> bool {
    excludes.iter().any(|matcher| {
        matcher.is_match(rel) || rel.split('/').any(|segment| matcher.is_match(segment))
    })
}

fn include_by_extension(rel: &str, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    let Some(ext) = Path::new(rel).extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

fn to_slash(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

// Ordered: first matching category wins (see module docs).
const FILE_TYPE_PATTERNS: &[(&str, &[&str])] = &[
    ("controller", &["*controller.ts", "*controller.js", "*handler.go", "*controller.rs", "*handler.rs"]),
    ("service", &["*service.ts", "*service.js", "*service.go", "*service.rs"]),
    ("repository", &["*repository.ts", "*repo.ts", "*repository.go", "*repository.rs"]),
    ("middleware", &["*middleware.ts", "*middleware.go", "*middleware.rs"]),
    ("dto", &["*dto.ts", "*dto.go", "**/dto/**"]),
    ("model", &["*model.ts", "*entity.ts", "*model.go", "*model.rs"]),
    ("config", &["*config.ts", "*config.go", "*config.rs"]),
    ("util", &["*util.ts", "*utils.ts", "*helper.ts", "*util.rs"]),
];

/// Infer a classification label for a path, or return `""`.
///
/// Each pattern is tested against the full slash-normalized path and the
/// basename; categories are tried in the documented priority order.
pub fn classify(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let base = normalized.rsplit('/').next().unwrap_or(&normalized);

    for (category, patterns) in FILE_TYPE_PATTERNS {
        for pattern in *patterns {
            let Ok(glob) = GlobBuilder::new(pattern).literal_separator(true).build() else {
                continue;
            };
            let matcher = glob.compile_matcher();
            if matcher.is_match(&normalized) || matcher.is_match(base) {
                return (*category).to_string();
            }
        }
    }
    String::new()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
