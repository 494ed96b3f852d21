//! Scan configuration defaults and loading.

use std::path::Path;

use serde::Deserialize;

use crate::error::{io_err, CoreError};
use crate::types::ScanConfig;

/// Default relative root used during scanning.
pub const DEFAULT_ROOT_PATH: &str = ".";
/// Prompt template version bundled with this build.
pub const DEFAULT_PROMPT_VERSION: &str = "2.1";

const DEFAULT_INCLUDED_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".go", ".py", ".rs"];

const DEFAULT_EXCLUDED_PATHS: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "dist",
    "build",
    ".next",
    "coverage",
    ".marrow",
    ".git",
    "*.test.*",
    "*.spec.*",
    "__tests__",
    "test",
];

/// A `ScanConfig` populated with defaults.
pub fn default_config() -> ScanConfig {
    ScanConfig {
        included_extensions: to_owned(DEFAULT_INCLUDED_EXTENSIONS),
        excluded_paths: to_owned(DEFAULT_EXCLUDED_PATHS),
        skeleton_prompt_version: DEFAULT_PROMPT_VERSION.to_string(),
        root_path: DEFAULT_ROOT_PATH.to_string(),
    }
}

/// Raw config document: list fields stay optional so an absent field is
/// distinguishable from an explicitly empty one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ScanConfigDoc {
    included_extensions: Option<Vec<String>>,
    excluded_paths: Option<Vec<String>>,
    skeleton_prompt_version: Option<String>,
    root_path: Option<String>,
}

/// Load the config at `path`.
///
/// An absent file yields defaults; malformed JSON is a data error. Fields
/// absent from the document are filled with defaults, but an explicitly
/// empty list is preserved — an empty `includedExtensions` means "track
/// everything".
pub fn load_at(path: &Path) -> Result<ScanConfig, CoreError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(default_config()),
        Err(err) => return Err(io_err(path, err)),
    };
    let doc: ScanConfigDoc = serde_json::from_str(&contents).map_err(|e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(resolve(doc))
}

/// Atomically save the config to `path`.
pub fn save_at(cfg: &ScanConfig, path: &Path) -> Result<(), CoreError> {
    crate::index::write_json_atomic(path, cfg)
}

fn resolve(doc: ScanConfigDoc) -> ScanConfig {
    ScanConfig {
        included_extensions: doc
            .included_extensions
            .unwrap_or_else(|| to_owned(DEFAULT_INCLUDED_EXTENSIONS)),
        excluded_paths: doc
            .excluded_paths
            .unwrap_or_else(|| to_owned(DEFAULT_EXCLUDED_PATHS)),
        skeleton_prompt_version: doc
            .skeleton_prompt_version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PROMPT_VERSION.to_string()),
        root_path: doc
            .root_path
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ROOT_PATH.to_string()),
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn absent_file_yields_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let cfg = load_at(&tmp.path().join("config.json")).expect("load");
        assert_eq!(cfg, default_config());
    }

    #[test]
    fn malformed_file_is_a_data_error() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        fs::write(&path, "{not json").expect("write");
        let err = load_at(&path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Data);
    }

    #[test]
    fn explicitly_empty_lists_are_preserved() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"includedExtensions":[],"excludedPaths":[]}"#).expect("write");

        let cfg = load_at(&path).expect("load");
        assert!(
            cfg.included_extensions.is_empty(),
            "empty include list means track everything and must survive the load"
        );
        assert!(cfg.excluded_paths.is_empty());
        assert_eq!(cfg.skeleton_prompt_version, DEFAULT_PROMPT_VERSION);
    }

    #[test]
    fn partial_document_is_filled_with_defaults() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"includedExtensions":[".zig"]}"#).expect("write");
        let cfg = load_at(&path).expect("load");
        assert_eq!(cfg.included_extensions, vec![".zig"]);
        assert_eq!(cfg.root_path, DEFAULT_ROOT_PATH);
        assert!(!cfg.excluded_paths.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("config.json");
        let cfg = default_config();
        save_at(&cfg, &path).expect("save");
        assert_eq!(load_at(&path).expect("load"), cfg);
    }
}
