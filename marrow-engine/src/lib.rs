//! # marrow-engine
//!
//! Reconciliation passes over the marrow index: change-set resolution,
//! sync, exhaustive validation, and orphaned-skeleton cleanup.
//!
//! All passes are single-threaded and synchronous; each loads the index,
//! mutates it fully in memory, and persists once at the end. Git is an
//! optimization input only — its absence or failure narrows nothing and
//! aborts nothing.

pub mod changeset;
pub mod clean;
pub mod error;
pub mod git;
pub mod sync;
pub mod validate;

pub use clean::CleanOutcome;
pub use error::EngineError;
pub use sync::{build_index_at, SyncOutcome};
pub use validate::{Issue, ValidateOutcome};
