//! Common context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::assembly::{Assembler, Assembly};
use crate::config::AssemblyConfig;
use crate::manifest::{Manifest, find_manifest_with_optional};
use crate::package::PackageNode;
use crate::provider::{FilesystemProvider, PackageProvider};

/// Everything a command needs about the project being assembled.
#[derive(Debug)]
pub struct CommandContext {
    /// Parsed root manifest (confmerge.toml)
    pub manifest: Manifest,
    /// Absolute path to the manifest file
    pub manifest_path: PathBuf,
    /// Project root directory (containing confmerge.toml)
    pub project_dir: PathBuf,
    /// Layered assembly configuration
    pub config: AssemblyConfig,
}

impl CommandContext {
    /// Locate the manifest (explicit path or upward search) and load the context.
    pub fn discover(manifest_path: Option<PathBuf>) -> Result<Self> {
        let manifest_path = find_manifest_with_optional(manifest_path)?;
        Self::from_manifest_path(manifest_path)
    }

    /// Create a context from a manifest path
    ///
    /// # Errors
    /// Returns an error if the manifest file doesn't exist or cannot be read
    pub fn from_manifest_path(manifest_path: impl AsRef<Path>) -> Result<Self> {
        let manifest_path = std::path::absolute(manifest_path.as_ref()).with_context(|| {
            format!("Failed to resolve manifest path: {}", manifest_path.as_ref().display())
        })?;

        if !manifest_path.exists() {
            return Err(anyhow::anyhow!("Manifest file {} not found", manifest_path.display()));
        }

        let project_dir = manifest_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Invalid manifest path"))?
            .to_path_buf();

        let manifest = Manifest::load(&manifest_path).with_context(|| {
            format!("Failed to parse manifest file: {}", manifest_path.display())
        })?;

        let config = AssemblyConfig::from_manifest(&project_dir, &manifest.config);
        tracing::debug!(
            "Project {} (output: {}, vendor: {})",
            project_dir.display(),
            config.output_dir.display(),
            config.vendor_dir.display()
        );

        Ok(Self {
            manifest,
            manifest_path,
            project_dir,
            config,
        })
    }

    /// Apply a command-line output directory override.
    pub fn override_output_dir(&mut self, dir: Option<&Path>) {
        if let Some(dir) = dir {
            self.config = self.config.clone().with_output_dir(&self.project_dir, dir);
        }
    }

    /// Load the root and every installed package.
    pub fn packages(&self) -> Result<Vec<PackageNode>> {
        FilesystemProvider::new(self.manifest.clone(), &self.config.vendor_dir).packages()
    }

    /// Run the full pipeline over `packages`.
    pub fn assemble(&self, packages: &[PackageNode]) -> Result<Assembly> {
        Assembler::new(self.config.clone())
            .assemble(packages)
            .context("Failed to assemble configuration")
    }
}
