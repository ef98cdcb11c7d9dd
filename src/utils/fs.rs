//! File system utilities
//!
//! Small helpers shared by the manifest loader and the artifact writer:
//! directory creation, staged writes, JSON rendering and lexical path
//! normalisation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use confmerge::utils::fs::{StagedFile, ensure_dir};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! ensure_dir(Path::new("config/build"))?;
//! let staged = StagedFile::stage(Path::new("config/build/files.json"), b"{}")?;
//! staged.persist()?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::core::ConfmergeError;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the path exists but is not a directory, or creation fails.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(ConfmergeError::FileSystemError {
            operation: "create directory over an existing file".to_string(),
            path: path.display().to_string(),
        }
        .into());
    }

    Ok(())
}

/// File content written to a temporary file next to its destination, not yet
/// visible at the destination path.
#[derive(Debug)]
pub struct StagedFile {
    temp: tempfile::NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    /// Write `content` into a synced temporary file in `path`'s directory.
    ///
    /// Dropping the staged file without persisting removes the temporary file.
    pub fn stage(path: &Path, content: &[u8]) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Path has no parent directory: {}", path.display()))?;
        ensure_dir(parent)?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;
        temp.write_all(content)
            .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
        temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

        Ok(Self {
            temp,
            path: path.to_path_buf(),
        })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Move the temporary file over the destination.
    pub fn persist(self) -> Result<PathBuf> {
        self.temp
            .persist(&self.path)
            .with_context(|| format!("Failed to rename temp file to: {}", self.path.display()))?;
        Ok(self.path)
    }
}

/// Serializes `data` as pretty JSON with a trailing newline.
pub fn json_bytes<T>(data: &T) -> Result<Vec<u8>>
where
    T: serde::Serialize,
{
    let mut json = serde_json::to_string_pretty(data).context("Failed to serialize JSON")?;
    json.push('\n');
    Ok(json.into_bytes())
}

/// Lexically normalises a path by folding `.` and `..` components.
///
/// The filesystem is never consulted, so symlinks are not resolved and the
/// path does not need to exist.
///
/// ```rust
/// use confmerge::utils::fs::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     normalize_path(Path::new("/project/vendor/acme/lib/../lib/./config/a.php")),
///     PathBuf::from("/project/vendor/acme/lib/config/a.php")
/// );
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_path_folds_dots() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./c/../d")),
            PathBuf::from("/a/b/d")
        );
    }

    #[test]
    fn test_normalize_path_does_not_escape_root() {
        assert_eq!(normalize_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_normalize_path_keeps_leading_parent_on_relative() {
        assert_eq!(normalize_path(Path::new("../a/./b")), PathBuf::from("../a/b"));
    }

    #[test]
    fn test_ensure_dir_rejects_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("build");
        fs::write(&file, "").unwrap();

        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfmergeError>(),
            Some(ConfmergeError::FileSystemError { .. })
        ));
    }

    #[test]
    fn test_staged_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/dir/out.json");

        StagedFile::stage(&target, b"{}").unwrap().persist().unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn test_staged_file_invisible_until_persisted() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("files.json");
        fs::write(&target, "old").unwrap();

        let staged = StagedFile::stage(&target, b"new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");

        drop(staged);
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_json_bytes_pretty_with_newline() {
        let bytes = json_bytes(&vec!["a"]).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[\n  \"a\"\n]\n");
    }
}
