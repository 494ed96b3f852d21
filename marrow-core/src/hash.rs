//! SHA-256 content hashing for change detection.
//!
//! Sources and skeletons are hashed byte-exact — no newline normalization —
//! so any byte change flips the digest.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, CoreError};

/// Hex digest of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hex digest of a file's contents, streamed.
///
/// Fails with an annotated I/O error if the file cannot be opened or read;
/// never returns a partial digest.
pub fn hash_file(path: &Path) -> Result<String, CoreError> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}
