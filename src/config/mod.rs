//! Assembly configuration.
//!
//! Settings are layered, later layers winning:
//!
//! 1. built-in defaults ([`DEFAULT_OUTPUT_DIR`], [`DEFAULT_VENDOR_DIR`],
//!    [`DEFAULT_PRIORITY_REVERSED`])
//! 2. the root manifest's `[config]` table
//! 3. environment variables [`ENV_OUTPUT_DIR`] and [`ENV_VENDOR_DIR`]
//! 4. command-line flags, applied by the CLI through [`AssemblyConfig::with_output_dir`]
//!
//! Relative directories are resolved against the root package directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_OUTPUT_DIR, DEFAULT_PRIORITY_REVERSED, DEFAULT_VENDOR_DIR, ENV_OUTPUT_DIR,
    ENV_VENDOR_DIR,
};
use crate::manifest::ConfigSection;
use crate::package::resolve_path;

/// Merge policy of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryPolicy {
    /// Contributions are appended: dependencies first, root last.
    Forward,
    /// Contributions are prepended: root first. Used for values that cannot
    /// be redefined once set.
    Reversed,
}

/// Resolved settings for one assembly run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyConfig {
    /// Absolute artifact directory for the base build.
    pub output_dir: PathBuf,
    /// Absolute directory holding installed packages.
    pub vendor_dir: PathBuf,
    /// Categories with [`CategoryPolicy::Reversed`].
    pub priority_reversed: BTreeSet<String>,
}

impl AssemblyConfig {
    /// Defaults relative to `root_dir`.
    pub fn defaults(root_dir: &Path) -> Self {
        Self {
            output_dir: root_dir.join(DEFAULT_OUTPUT_DIR),
            vendor_dir: root_dir.join(DEFAULT_VENDOR_DIR),
            priority_reversed: DEFAULT_PRIORITY_REVERSED.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Layer the manifest `[config]` table and the process environment over the defaults.
    pub fn from_manifest(root_dir: &Path, section: &ConfigSection) -> Self {
        Self::from_manifest_with_env(root_dir, section, |key| std::env::var(key).ok())
    }

    /// Like [`from_manifest`](Self::from_manifest) with an injectable environment lookup.
    pub fn from_manifest_with_env<F>(root_dir: &Path, section: &ConfigSection, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults(root_dir);

        if let Some(dir) = &section.output_dir {
            config.output_dir = resolve_path(root_dir, dir);
        }
        if let Some(dir) = &section.vendor_dir {
            config.vendor_dir = resolve_path(root_dir, dir);
        }
        if let Some(categories) = &section.priority_reversed {
            config.priority_reversed = categories.iter().cloned().collect();
        }

        if let Some(dir) = env(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
            tracing::debug!("Output directory overridden by {ENV_OUTPUT_DIR}: {dir}");
            config.output_dir = resolve_path(root_dir, Path::new(&dir));
        }
        if let Some(dir) = env(ENV_VENDOR_DIR).filter(|v| !v.is_empty()) {
            tracing::debug!("Vendor directory overridden by {ENV_VENDOR_DIR}: {dir}");
            config.vendor_dir = resolve_path(root_dir, Path::new(&dir));
        }

        config
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, root_dir: &Path, dir: &Path) -> Self {
        self.output_dir = resolve_path(root_dir, dir);
        self
    }

    /// Merge policy for `category`; unlisted categories are forward.
    pub fn policy(&self, category: &str) -> CategoryPolicy {
        if self.priority_reversed.contains(category) {
            CategoryPolicy::Reversed
        } else {
            CategoryPolicy::Forward
        }
    }

    /// Artifact directory of a named alternative.
    pub fn alternative_output_dir(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}
