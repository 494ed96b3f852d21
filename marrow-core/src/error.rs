//! Error types for marrow-core.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of an error, used by the CLI to pick an exit code.
///
/// Mirrors the three fatal conditions the tool can surface: a precondition
/// the user must fix, an I/O failure, or malformed persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    User,
    Filesystem,
    Data,
}

/// All errors that can arise from core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load — includes the file path.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The workspace has no `.marrow/` directory.
    #[error("not initialized at {root}; run `marrow init` first")]
    NotInitialized { root: PathBuf },

    /// A required data file is gone while `.marrow/` itself exists.
    #[error("missing {path}; run `marrow rebuild --confirm` to restore")]
    MissingDataFile { path: PathBuf },
}

impl CoreError {
    /// Classify this error for exit-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Io { .. } => ErrorKind::Filesystem,
            CoreError::Parse { .. } | CoreError::Json(_) | CoreError::MissingDataFile { .. } => {
                ErrorKind::Data
            }
            CoreError::NotInitialized { .. } => ErrorKind::User,
        }
    }
}

/// Convenience constructor for [`CoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
