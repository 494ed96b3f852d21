//! Subcommand implementations. Each module exposes a clap `Args` struct
//! with a `run(self, root)` method; `root` is the workspace the process
//! was started in.

pub mod clean;
pub mod export;
pub mod generate;
pub mod init;
pub mod pipeline;
pub mod rebuild;
pub mod status;
pub mod sync;
pub mod validate;

use marrow_core::ErrorKind;

/// A command-level failure carrying its own exit-code classification,
/// for conditions the library crates never see (bad flag combinations,
/// strict-mode verdicts, output-file write failures).
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CommandError {
    pub message: String,
    pub kind: ErrorKind,
}

pub fn user_error(message: impl Into<String>) -> anyhow::Error {
    CommandError {
        message: message.into(),
        kind: ErrorKind::User,
    }
    .into()
}

pub fn fs_error(message: impl Into<String>) -> anyhow::Error {
    CommandError {
        message: message.into(),
        kind: ErrorKind::Filesystem,
    }
    .into()
}

pub fn data_error(message: impl Into<String>) -> anyhow::Error {
    CommandError {
        message: message.into(),
        kind: ErrorKind::Data,
    }
    .into()
}
