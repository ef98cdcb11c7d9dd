//! Pluggable readers for external alternative definition files.
//!
//! A definition file maps alternative names to category files:
//!
//! ```yaml
//! dev:
//!   params: config/params-dev.php
//! prod:
//!   params: [config/params-prod.php]
//! ```
//!
//! The format is chosen from the extension; see [`FileFormat::from_path`].

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::ConfmergeError;
use crate::package::AlternativeSet;

/// Reader failure, turned into a [`ConfmergeError`] once the declaring package is known.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Nothing exists at the path.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but is not a valid definition.
    #[error("failed to parse {}: {reason}", path.display())]
    Parse {
        /// File path
        path: PathBuf,
        /// Parser message
        reason: String,
    },
    /// No reader handles this extension.
    #[error("unsupported format: {}", .0.display())]
    Unsupported(PathBuf),
}

impl ReadError {
    /// Attribute the failure to `package`.
    pub fn for_package(self, package: &str) -> ConfmergeError {
        match self {
            Self::NotFound(path) => ConfmergeError::ConfigFileNotFound {
                package: package.to_string(),
                path: path.display().to_string(),
            },
            Self::Parse { path, reason } => ConfmergeError::ConfigFileParseError {
                path: path.display().to_string(),
                reason,
            },
            Self::Unsupported(path) => ConfmergeError::UnsupportedFormat {
                path: path.display().to_string(),
            },
        }
    }
}

/// Reads an alternatives definition from an absolute path.
pub trait FormatReader {
    /// Parse the file at `path`.
    fn read(&self, path: &Path) -> Result<AlternativeSet, ReadError>;
}

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl FileFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Deserialize `content` in this format.
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Default reader dispatching on [`FileFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionReader;

impl FormatReader for ExtensionReader {
    fn read(&self, path: &Path) -> Result<AlternativeSet, ReadError> {
        if !path.is_file() {
            return Err(ReadError::NotFound(path.to_path_buf()));
        }

        let format =
            FileFormat::from_path(path).ok_or_else(|| ReadError::Unsupported(path.to_path_buf()))?;

        let content = std::fs::read_to_string(path).map_err(|e| ReadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Reading {:?} alternatives from {}", format, path.display());

        format.parse(&content).map_err(|reason| ReadError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_path(Path::new("a.toml")), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_path(Path::new("a.JSON")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("a.yml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_path(Path::new("a.php")), None);
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_read_each_format() {
        let temp = TempDir::new().unwrap();
        let cases = [
            ("alt.toml", "[dev]\nparams = \"p-dev.php\"\n"),
            ("alt.json", r#"{"dev": {"params": ["p-dev.php"]}}"#),
            ("alt.yaml", "dev:\n  params: p-dev.php\n"),
        ];

        for (name, content) in cases {
            let path = temp.path().join(name);
            fs::write(&path, content).unwrap();
            let set = ExtensionReader.read(&path).unwrap();
            assert_eq!(set.len(), 1, "{name}");
            assert_eq!(set["dev"].get("params").unwrap().len(), 1, "{name}");
        }
    }

    #[test]
    fn test_missing_file_is_distinguishable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");
        assert_eq!(ExtensionReader.read(&path), Err(ReadError::NotFound(path.clone())));

        let error = ReadError::NotFound(path).for_package("acme/app");
        assert!(matches!(error, ConfmergeError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn test_parse_failure() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("alt.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(ExtensionReader.read(&path), Err(ReadError::Parse { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("alt.ini");
        fs::write(&path, "dev=1").unwrap();
        assert!(matches!(ExtensionReader.read(&path), Err(ReadError::Unsupported(_))));
    }
}
