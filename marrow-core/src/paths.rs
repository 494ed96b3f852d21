//! Workspace path helpers.
//!
//! # Storage layout
//!
//! ```text
//! <root>/.marrow/
//!   config.json           (scan configuration)
//!   index.json            (persisted index)
//!   skeleton-prompt.txt   (generation prompt template, user-editable)
//!   skeletons/            (skeleton files, mirroring the source tree)
//! ```
//!
//! Every helper takes the workspace root explicitly; tests pass a
//! `TempDir` path and the CLI passes its resolved current directory.

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Name of the workspace data directory.
pub const DATA_DIR: &str = ".marrow";
/// Config file name inside the data directory.
pub const CONFIG_FILE: &str = "config.json";
/// Index file name inside the data directory.
pub const INDEX_FILE: &str = "index.json";
/// Prompt template file name inside the data directory.
pub const PROMPT_FILE: &str = "skeleton-prompt.txt";

/// `<root>/.marrow/`
pub fn data_dir_at(root: &Path) -> PathBuf {
    root.join(DATA_DIR)
}

/// `<root>/.marrow/config.json`
pub fn config_path_at(root: &Path) -> PathBuf {
    data_dir_at(root).join(CONFIG_FILE)
}

/// `<root>/.marrow/index.json`
pub fn index_path_at(root: &Path) -> PathBuf {
    data_dir_at(root).join(INDEX_FILE)
}

/// `<root>/.marrow/skeleton-prompt.txt`
pub fn prompt_path_at(root: &Path) -> PathBuf {
    data_dir_at(root).join(PROMPT_FILE)
}

/// `<root>/.marrow/skeletons/`
pub fn skeleton_dir_at(root: &Path) -> PathBuf {
    root.join(crate::skeleton::SKELETON_ROOT)
}

/// Whether `marrow init` has run at `root`.
pub fn is_initialized(root: &Path) -> bool {
    data_dir_at(root).is_dir()
}

/// Error with [`CoreError::NotInitialized`] unless the workspace exists.
pub fn ensure_initialized(root: &Path) -> Result<(), CoreError> {
    if is_initialized(root) {
        return Ok(());
    }
    Err(CoreError::NotInitialized {
        root: root.to_path_buf(),
    })
}
