//! Manifest file discovery in directory hierarchies.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::constants::MANIFEST_FILE;
use crate::core::ConfmergeError;

/// Find manifest by searching up the directory tree from the current directory.
///
/// Mirrors Cargo and Git project file discovery.
///
/// ```rust,no_run
/// use confmerge::manifest::find_manifest;
///
/// match find_manifest() {
///     Ok(path) => println!("Found manifest at: {}", path.display()),
///     Err(e) => println!("No manifest found: {}", e),
/// }
/// ```
pub fn find_manifest() -> Result<PathBuf> {
    let current = std::env::current_dir()
        .context("Cannot determine current working directory. This may indicate a permission issue or corrupted filesystem")?;
    find_manifest_from(current)
}

/// Find manifest using an explicit path or directory search.
///
/// An explicit path must exist; without one the search starts from the
/// current directory.
pub fn find_manifest_with_optional(explicit_path: Option<PathBuf>) -> Result<PathBuf> {
    match explicit_path {
        Some(path) => {
            if path.exists() {
                Ok(path)
            } else {
                Err(ConfmergeError::ManifestNotFound.into())
            }
        }
        None => find_manifest(),
    }
}

/// Find manifest by searching up from a specific starting directory.
///
/// # Errors
///
/// Returns [`ConfmergeError::ManifestNotFound`] wrapped in an [`anyhow::Error`]
/// if no manifest is found after searching to the filesystem root.
pub fn find_manifest_from(mut current: PathBuf) -> Result<PathBuf> {
    loop {
        let manifest_path = current.join(MANIFEST_FILE);
        if manifest_path.exists() {
            return Ok(manifest_path);
        }

        if !current.pop() {
            return Err(ConfmergeError::ManifestNotFound.into());
        }
    }
}
