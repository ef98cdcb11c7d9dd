//! Package manifest (`confmerge.toml`) parsing.
//!
//! Every package, root or installed, describes itself with the same manifest.
//! Sections other than `[package]`, `[files]` and `[dev-files]` only take effect
//! on the root.
//!
//! # Format
//!
//! ```toml
//! # Root only: an external definition file, or an inline [alternatives] table
//! alternatives = "config/alternatives.toml"
//!
//! [package]
//! name = "acme/app"
//! version = "1.0.0"
//! reference = "3f2a9c1"
//! require = ["acme/lib-a"]
//! require-dev = ["acme/testing"]
//!
//! [package.aliases]
//! "@app" = "src"
//!
//! [files]
//! params = ["config/params.php"]
//! defines = "config/defines.php"
//! web = ["$common", "config/web.php"]
//!
//! [dev-files]
//! params = ["?config/params-local.php"]
//!
//! # Root only
//! [config]
//! output-dir = "config/build"
//! vendor-dir = "vendor"
//! priority-reversed = ["defines"]
//! ```

mod helpers;

pub use helpers::{find_manifest, find_manifest_from, find_manifest_with_optional};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::ConfmergeError;
use crate::package::{AlternativesDecl, CategoryFiles, PackageNode};

/// Parsed `confmerge.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    /// Raw alternatives declaration; its shape is only checked for the root.
    #[serde(default)]
    pub alternatives: Option<toml::Value>,

    /// Package identity and dependency edges.
    pub package: PackageSection,

    /// Declared configuration files per category.
    #[serde(default)]
    pub files: CategoryFiles,

    /// Development files, merged only for the root.
    #[serde(default)]
    pub dev_files: CategoryFiles,

    /// Root-only assembly settings.
    #[serde(default)]
    pub config: ConfigSection,

    /// Directory containing the manifest.
    #[serde(skip)]
    pub manifest_dir: PathBuf,
}

/// The `[package]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageSection {
    /// Unique package name.
    pub name: String,
    /// Informational version.
    #[serde(default)]
    pub version: Option<String>,
    /// Informational source reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Required package names.
    #[serde(default)]
    pub require: Vec<String>,
    /// Development requirements.
    #[serde(default)]
    pub require_dev: Vec<String>,
    /// Alias name → path relative to the package.
    #[serde(default)]
    pub aliases: BTreeMap<String, PathBuf>,
}

/// The `[config]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigSection {
    /// Artifact directory, relative to the root package.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Installed package directory, relative to the root package.
    #[serde(default)]
    pub vendor_dir: Option<PathBuf>,
    /// Categories whose contributions are placed root-first.
    #[serde(default)]
    pub priority_reversed: Option<Vec<String>>,
}

impl Manifest {
    /// Load and parse a manifest file.
    ///
    /// # Errors
    ///
    /// - the file cannot be read
    /// - the TOML is invalid ([`ConfmergeError::ManifestParseError`])
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;

        let mut manifest = Self::parse(&content, path)?;

        manifest.manifest_dir = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Manifest path has no parent directory"))?
            .to_path_buf();

        Ok(manifest)
    }

    /// Parse manifest content; `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ConfmergeError::ManifestParseError {
                file: path.display().to_string(),
                reason: e.to_string(),
            })
            .with_context(|| format!("Invalid TOML syntax in manifest file: {}", path.display()))
    }

    /// Convert into a graph node rooted at the manifest directory.
    ///
    /// Requirement lists are de-duplicated keeping first occurrence. For the root,
    /// the alternatives declaration must be a path or a table.
    ///
    /// # Errors
    ///
    /// [`ConfmergeError::InvalidAlternatives`] when the root declares alternatives
    /// of any other shape.
    pub fn into_node(self, is_root: bool) -> Result<PackageNode, ConfmergeError> {
        let name = self.package.name;

        let alternatives = match (is_root, self.alternatives) {
            (true, Some(value)) => Some(value.try_into::<AlternativesDecl>().map_err(|e| {
                ConfmergeError::InvalidAlternatives {
                    package: name.clone(),
                    reason: format!("expected a file path or a table of alternatives ({e})"),
                }
            })?),
            _ => None,
        };

        Ok(PackageNode {
            version: self.package.version,
            reference: self.package.reference,
            is_root,
            complete: true,
            root_dir: self.manifest_dir,
            requires: dedup_names(self.package.require),
            dev_requires: dedup_names(self.package.require_dev),
            files: self.files,
            dev_files: self.dev_files,
            aliases: self.package.aliases,
            alternatives,
            name,
        })
    }
}

fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::FileEntry;

    fn parse(content: &str) -> Manifest {
        let mut manifest = Manifest::parse(content, Path::new("confmerge.toml")).unwrap();
        manifest.manifest_dir = PathBuf::from("/project");
        manifest
    }

    #[test]
    fn test_full_manifest() {
        let manifest = parse(
            r#"
alternatives = "config/alternatives.toml"

[package]
name = "acme/app"
version = "1.0.0"
require = ["acme/lib-a", "acme/lib-b", "acme/lib-a"]
require-dev = ["acme/testing"]

[package.aliases]
"@app" = "src"

[files]
params = ["config/params.php"]
defines = "config/defines.php"

[dev-files]
params = ["?config/params-local.php"]

[config]
output-dir = "build"
priority-reversed = ["defines", "constants"]
"#,
        );

        assert_eq!(manifest.config.output_dir, Some(PathBuf::from("build")));
        assert_eq!(manifest.config.vendor_dir, None);

        let node = manifest.into_node(true).unwrap();
        assert!(node.is_root);
        assert_eq!(node.requires, vec!["acme/lib-a", "acme/lib-b"]);
        assert_eq!(node.dev_requires, vec!["acme/testing"]);
        assert_eq!(node.files.categories(), vec!["params", "defines"]);
        assert_eq!(
            node.dev_files.get("params").unwrap()[0],
            FileEntry::parse("?config/params-local.php")
        );
        assert_eq!(
            node.alternatives,
            Some(AlternativesDecl::External(PathBuf::from("config/alternatives.toml")))
        );
        assert_eq!(node.root_dir, PathBuf::from("/project"));
    }

    #[test]
    fn test_invalid_alternatives_on_root_is_configuration_error() {
        let manifest = parse(
            r#"
alternatives = 7

[package]
name = "acme/app"
"#,
        );

        let err = manifest.into_node(true).unwrap_err();
        assert!(matches!(
            err,
            ConfmergeError::InvalidAlternatives { ref package, .. } if package == "acme/app"
        ));
    }

    #[test]
    fn test_alternatives_ignored_on_dependencies() {
        let manifest = parse(
            r#"
alternatives = 7

[package]
name = "acme/lib"
"#,
        );

        let node = manifest.into_node(false).unwrap();
        assert_eq!(node.alternatives, None);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Manifest::parse("[package", Path::new("/x/confmerge.toml")).unwrap_err();
        let typed = err.downcast_ref::<ConfmergeError>().unwrap();
        assert!(matches!(
            typed,
            ConfmergeError::ManifestParseError { file, .. } if file == "/x/confmerge.toml"
        ));
    }

    #[test]
    fn test_missing_package_name_fails() {
        assert!(Manifest::parse("[package]\nversion = \"1\"\n", Path::new("c.toml")).is_err());
    }
}
