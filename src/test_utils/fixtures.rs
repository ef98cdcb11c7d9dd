//! Test fixtures for on-disk projects
//!
//! [`ProjectFixture`] lays out a root package and its vendor directory inside a
//! temporary directory; [`ManifestFixture`] holds ready-made manifests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::{DEFAULT_VENDOR_DIR, MANIFEST_FILE};

const EMPTY_CONFIG: &str = "<?php\n\nreturn [];\n";

/// Test fixture for creating sample confmerge.toml files
#[derive(Clone, Debug)]
pub struct ManifestFixture {
    /// Manifest content
    pub content: String,
    /// Fixture name, for test messages
    pub name: String,
}

impl ManifestFixture {
    /// Root requiring `acme/lib-a`, declaring `params` and `defines`
    pub fn basic_root() -> Self {
        Self {
            name: "basic_root".to_string(),
            content: r#"
[package]
name = "acme/app"
require = ["acme/lib-a"]

[files]
params = ["config/params.php"]
defines = ["config/defines.php"]
"#
            .trim()
            .to_string(),
        }
    }

    /// Dependency declaring one `params` file
    pub fn basic_lib() -> Self {
        Self {
            name: "basic_lib".to_string(),
            content: r#"
[package]
name = "acme/lib-a"
version = "1.0.0"

[files]
params = "config/params.php"
"#
            .trim()
            .to_string(),
        }
    }

    /// Manifest with invalid syntax
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: "[package\nname = \"acme/app\"".to_string(),
        }
    }

    /// Custom content
    pub fn custom(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.trim().to_string(),
        }
    }

    /// Write to `dir/confmerge.toml`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(MANIFEST_FILE);
        write_file(&path, &self.content)?;
        Ok(path)
    }
}

/// A temporary project: root manifest plus `vendor/<vendor>/<name>/` packages.
#[derive(Debug)]
pub struct ProjectFixture {
    temp: TempDir,
}

impl ProjectFixture {
    /// Empty project directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    /// Project directory
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Root manifest path
    pub fn manifest_path(&self) -> PathBuf {
        self.path().join(MANIFEST_FILE)
    }

    /// Directory of an installed package
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.path().join(DEFAULT_VENDOR_DIR).join(name)
    }

    /// Write the root manifest
    pub fn with_root(self, manifest: &ManifestFixture) -> Result<Self> {
        manifest.write_to(self.path())?;
        Ok(self)
    }

    /// Install a package with a manifest under `vendor/<name>`
    pub fn with_package(self, name: &str, manifest: &ManifestFixture) -> Result<Self> {
        manifest.write_to(&self.package_dir(name))?;
        Ok(self)
    }

    /// Install a package directory without a manifest
    pub fn with_incomplete_package(self, name: &str) -> Result<Self> {
        let dir = self.package_dir(name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(self)
    }

    /// Write any file relative to the project directory
    pub fn with_file(self, relative: &str, content: &str) -> Result<Self> {
        write_file(&self.path().join(relative), content)?;
        Ok(self)
    }

    /// Write a file relative to an installed package's directory
    pub fn with_package_file(self, name: &str, relative: &str, content: &str) -> Result<Self> {
        write_file(&self.package_dir(name).join(relative), content)?;
        Ok(self)
    }

    /// Create empty PHP config files relative to the project directory
    pub fn with_config_files(self, relatives: &[&str]) -> Result<Self> {
        for relative in relatives {
            write_file(&self.path().join(relative), EMPTY_CONFIG)?;
        }
        Ok(self)
    }

    /// The basic two-package project, with every declared file on disk
    pub fn basic() -> Result<Self> {
        Self::new()?
            .with_root(&ManifestFixture::basic_root())?
            .with_config_files(&["config/params.php", "config/defines.php"])?
            .with_package("acme/lib-a", &ManifestFixture::basic_lib())?
            .with_package_file("acme/lib-a", "config/params.php", EMPTY_CONFIG)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
