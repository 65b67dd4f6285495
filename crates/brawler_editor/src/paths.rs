//! Portable relative paths for level references
//!
//! Levels reference backgrounds, panels and templates by path; storing them
//! relative to a base directory keeps a level folder movable between
//! machines.

use std::path::{Path, PathBuf};

/// Path of `target` relative to the directory `base`.
///
/// Walks up out of the components of `base` not shared with `target`
/// (one `..` each), then down into the rest of `target`. Identical paths
/// yield an empty path.
pub fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base_components: Vec<_> = base.components().collect();
    let target_components: Vec<_> = target.components().collect();

    let shared = base_components
        .iter()
        .zip(&target_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in shared..base_components.len() {
        result.push("..");
    }
    for component in &target_components[shared..] {
        result.push(component);
    }
    result
}
