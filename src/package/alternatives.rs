//! Root-only alternative build declarations.
//!
//! The root manifest may declare alternatives inline:
//!
//! ```toml
//! [alternatives.dev]
//! params = ["config/params-dev.php"]
//!
//! [alternatives.prod]
//! params = ["config/params-prod.php"]
//! ```
//!
//! or point at an external file read through a [`FormatReader`](crate::reader::FormatReader):
//!
//! ```toml
//! alternatives = "config/alternatives.yaml"
//! ```
//!
//! Any other shape is rejected when the root manifest is loaded.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use super::CategoryFiles;
use crate::constants::{ALIASES_ARTIFACT, FILES_ARTIFACT, PACKAGES_ARTIFACT};

/// Alternative name → override files for the root package.
///
/// Alternatives are built in name order.
pub type AlternativeSet = BTreeMap<String, CategoryFiles>;

/// Where the root package's alternatives come from.
///
/// Absence is modelled as `Option::<AlternativesDecl>::None` on the package.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AlternativesDecl {
    /// Path to an external definition file, relative to the root package.
    External(PathBuf),
    /// Definitions given inline in the manifest.
    Inline(AlternativeSet),
}

/// A named alternative build: the root's override files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternativeSpec {
    /// Alternative name; artifacts land in `<output-dir>/<name>`.
    pub name: String,
    /// Files applied as if the root package had declared them.
    pub files: CategoryFiles,
}

impl AlternativeSpec {
    /// Create a spec from a name and its override files.
    pub fn new(name: impl Into<String>, files: CategoryFiles) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    /// Flatten an [`AlternativeSet`] into specs, in name order.
    pub fn from_set(set: AlternativeSet) -> Vec<Self> {
        set.into_iter().map(|(name, files)| Self::new(name, files)).collect()
    }

    /// Check that `name` is usable as a directory under the output dir.
    ///
    /// The name must be a single plain path component and must not shadow one
    /// of the base build's artifact files.
    ///
    /// # Errors
    ///
    /// Returns the reason the name was rejected.
    pub fn check_name(name: &str) -> Result<(), String> {
        if name.is_empty() {
            return Err("alternative name is empty".to_string());
        }

        let mut components = Path::new(name).components();
        let single = match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => part == name,
            _ => false,
        };
        if !single {
            return Err(format!("alternative name '{name}' must be a single directory name"));
        }

        if [FILES_ARTIFACT, PACKAGES_ARTIFACT, ALIASES_ARTIFACT].contains(&name) {
            return Err(format!("alternative name '{name}' clashes with a build artifact"));
        }

        Ok(())
    }
}
