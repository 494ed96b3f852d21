//! Skeleton path derivation.
//!
//! The skeleton path is a pure function of the source path: same relative
//! location and extension under [`SKELETON_ROOT`], with `.skeleton`
//! inserted before the extension. Every code path that needs a skeleton
//! path must go through [`path_for_source`].

/// Root directory for skeleton files, relative to the workspace root.
pub const SKELETON_ROOT: &str = ".marrow/skeletons";

/// Relative skeleton path for a relative source path.
///
/// `src/app.go` → `.marrow/skeletons/src/app.skeleton.go`
pub fn path_for_source(source: &str) -> String {
    let normalized = source.replace('\\', "/");
    match normalized.rfind('.') {
        // Only treat the dot as an extension separator when it is part of
        // the final segment and not a leading dot (`.gitignore`).
        Some(pos) if !normalized[pos..].contains('/') && pos > last_segment_start(&normalized) => {
            let (base, ext) = normalized.split_at(pos);
            format!("{SKELETON_ROOT}/{base}.skeleton{ext}")
        }
        _ => format!("{SKELETON_ROOT}/{normalized}.skeleton"),
    }
}

fn last_segment_start(path: &str) -> usize {
    path.rfind('/').map(|p| p + 1).unwrap_or(0)
}
