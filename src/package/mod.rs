//! Package graph data model.
//!
//! A [`PackageNode`] is one loaded package: its identity, declared dependency
//! edges and declared per-category configuration files. Nodes are built once per
//! run by a [`PackageProvider`](crate::provider::PackageProvider) and never
//! mutated afterwards.
//!
//! The graph formed by `requires` may contain cycles and may name packages that
//! were never loaded; both are tolerated by the orderer.

pub mod alternatives;
pub mod files;

pub use alternatives::{AlternativeSet, AlternativeSpec, AlternativesDecl};
pub use files::{CategoryFiles, ConfigFile, FileEntry, resolve_path};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A loaded package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    /// Unique package name, e.g. `acme/lib-a`.
    pub name: String,
    /// Informational version string.
    pub version: Option<String>,
    /// Informational source reference (commit, tag).
    pub reference: Option<String>,
    /// True for exactly one node: the project being built.
    pub is_root: bool,
    /// Incomplete packages are ordered but contribute no files.
    pub complete: bool,
    /// Directory that relative file paths are resolved against.
    pub root_dir: PathBuf,
    /// Names of required packages, in declaration order.
    pub requires: Vec<String>,
    /// Names of development requirements, traversed only from the root.
    pub dev_requires: Vec<String>,
    /// Declared files per category.
    pub files: CategoryFiles,
    /// Declared development files, merged only for the root.
    pub dev_files: CategoryFiles,
    /// Alias name → path relative to `root_dir`.
    pub aliases: BTreeMap<String, PathBuf>,
    /// Root-only alternative build declaration.
    pub alternatives: Option<AlternativesDecl>,
}

impl PackageNode {
    /// Create a complete, non-root package with no edges or files.
    pub fn new(name: impl Into<String>, root_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            version: None,
            reference: None,
            is_root: false,
            complete: true,
            root_dir: root_dir.into(),
            requires: Vec::new(),
            dev_requires: Vec::new(),
            files: CategoryFiles::new(),
            dev_files: CategoryFiles::new(),
            aliases: BTreeMap::new(),
            alternatives: None,
        }
    }

    /// Mark as the root package.
    #[must_use]
    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Mark as incomplete.
    #[must_use]
    pub fn incomplete(mut self) -> Self {
        self.complete = false;
        self
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the required package names.
    #[must_use]
    pub fn with_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the development requirement names.
    #[must_use]
    pub fn with_dev_requires<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dev_requires = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the declared files.
    #[must_use]
    pub fn with_files(mut self, files: CategoryFiles) -> Self {
        self.files = files;
        self
    }

    /// Set the declared development files.
    #[must_use]
    pub fn with_dev_files(mut self, files: CategoryFiles) -> Self {
        self.dev_files = files;
        self
    }

    /// Set the alternatives declaration.
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: AlternativesDecl) -> Self {
        self.alternatives = Some(alternatives);
        self
    }

    /// Resolve a path relative to this package's directory.
    pub fn prepare_path(&self, relative: &Path) -> PathBuf {
        resolve_path(&self.root_dir, relative)
    }

    /// Version for display, `dev` when none was declared.
    pub fn pretty_version(&self) -> &str {
        self.version.as_deref().unwrap_or("dev")
    }

    /// Registration metadata with aliases resolved to absolute paths.
    pub fn metadata(&self) -> PackageMetadata {
        PackageMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            reference: self.reference.clone(),
            aliases: self
                .aliases
                .iter()
                .map(|(alias, path)| (alias.clone(), self.prepare_path(path)))
                .collect(),
        }
    }
}

/// Per-package metadata exposed to the artifact writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMetadata {
    /// Package name.
    pub name: String,
    /// Declared version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Source reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Alias name → absolute path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, PathBuf>,
}
