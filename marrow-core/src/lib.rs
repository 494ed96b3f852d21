//! # marrow-core
//!
//! Domain types and persistence for the marrow skeleton index.
//!
//! The index maps every tracked source file to its generated skeleton
//! artifact, records content hashes for change detection, and is persisted
//! as `.marrow/index.json` inside the workspace. Higher-level passes
//! (sync, validate, clean) live in `marrow-engine`.
//!
//! Every operation takes the workspace root as an explicit parameter;
//! nothing in this crate reads the process working directory.

pub mod config;
pub mod error;
pub mod hash;
pub mod index;
pub mod paths;
pub mod skeleton;
pub mod types;

pub use error::{CoreError, ErrorKind};
pub use types::{FileEntry, Index, IndexStats, ScanConfig, Status};
