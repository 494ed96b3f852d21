//! Error types for marrow-engine.

use std::path::PathBuf;

use thiserror::Error;

use marrow_core::{CoreError, ErrorKind};
use marrow_scan::ScanError;

/// All errors that can arise from engine passes.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An error from index/config persistence.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error from the file scanner.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EngineError {
    /// Classify this error for exit-code mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(err) => err.kind(),
            EngineError::Scan(err) => err.kind(),
            EngineError::Io { .. } => ErrorKind::Filesystem,
        }
    }
}

/// Convenience constructor for [`EngineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> EngineError {
    EngineError::Io {
        path: path.into(),
        source,
    }
}
