//! Build artifacts.
//!
//! The engine hands its final lists to an [`ArtifactWriter`]. The default
//! [`JsonArtifactWriter`] produces three files per build directory:
//!
//! | File | Content |
//! |---|---|
//! | `files.json` | category → ordered absolute paths |
//! | `packages.json` | package metadata in build order |
//! | `aliases.json` | merged alias → absolute path map |
//!
//! The base build goes to the output directory and each alternative to
//! `<output-dir>/<name>/`. Writing happens in three passes: every artifact set
//! is planned and rendered, then every file is staged next to its destination,
//! and only then are the staged files moved into place. A missing required
//! file, a rendering failure or a staging failure leaves existing artifacts
//! untouched; only a failing final rename can leave a partial update.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::assembly::{Assembly, CategoryLists};
use crate::config::AssemblyConfig;
use crate::constants::{ALIASES_ARTIFACT, FILES_ARTIFACT, PACKAGES_ARTIFACT};
use crate::core::ConfmergeError;
use crate::package::PackageMetadata;
use crate::utils::{StagedFile, json_bytes};

/// Everything written for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildArtifacts {
    /// Category → ordered absolute paths.
    pub files: BTreeMap<String, Vec<PathBuf>>,
    /// Package metadata in build order.
    pub packages: Vec<PackageMetadata>,
    /// Alias → absolute path; later packages override earlier ones.
    pub aliases: BTreeMap<String, PathBuf>,
}

impl BuildArtifacts {
    /// Prepare artifacts, dropping optional files that do not exist.
    pub fn new(lists: &CategoryLists, packages: &[PackageMetadata]) -> Self {
        let files = lists
            .iter()
            .map(|(category, files)| {
                let paths = files
                    .iter()
                    .filter(|file| {
                        let keep = !file.optional || file.path.exists();
                        if !keep {
                            tracing::debug!(
                                "Dropping missing optional file {} from {category}",
                                file.path.display()
                            );
                        }
                        keep
                    })
                    .map(|file| file.path.clone())
                    .collect();
                (category.clone(), paths)
            })
            .collect();

        let mut aliases = BTreeMap::new();
        for package in packages {
            for (alias, path) in &package.aliases {
                aliases.insert(alias.clone(), path.clone());
            }
        }

        Self {
            files,
            packages: packages.to_vec(),
            aliases,
        }
    }

    /// Prepare artifacts after checking that every required file exists.
    ///
    /// # Errors
    ///
    /// [`ConfmergeError::ConfigFileNotFound`] naming the package from
    /// `origins` that declared the first missing file.
    pub fn checked(
        lists: &CategoryLists,
        packages: &[PackageMetadata],
        origins: &BTreeMap<PathBuf, String>,
    ) -> Result<Self, ConfmergeError> {
        for file in lists.values().flatten() {
            if !file.optional && !file.path.exists() {
                let package = origins.get(&file.path).map_or_else(
                    || packages.last().map_or_else(String::new, |root| root.name.clone()),
                    Clone::clone,
                );
                return Err(ConfmergeError::ConfigFileNotFound {
                    package,
                    path: file.path.display().to_string(),
                });
            }
        }
        Ok(Self::new(lists, packages))
    }
}

/// Renders one build's artifacts into named files.
pub trait ArtifactWriter {
    /// File name → content for `artifacts`.
    fn render(&self, artifacts: &BuildArtifacts) -> Result<Vec<(&'static str, Vec<u8>)>>;
}

/// Writes pretty-printed JSON artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArtifactWriter;

impl ArtifactWriter for JsonArtifactWriter {
    fn render(&self, artifacts: &BuildArtifacts) -> Result<Vec<(&'static str, Vec<u8>)>> {
        Ok(vec![
            (FILES_ARTIFACT, json_bytes(&artifacts.files)?),
            (PACKAGES_ARTIFACT, json_bytes(&artifacts.packages)?),
            (ALIASES_ARTIFACT, json_bytes(&artifacts.aliases)?),
        ])
    }
}

/// Artifact directory → artifacts, base build first.
///
/// # Errors
///
/// Fails if a required file of the base build or of any alternative is
/// missing.
pub fn plan_artifacts(
    config: &AssemblyConfig,
    assembly: &Assembly,
) -> Result<Vec<(PathBuf, BuildArtifacts)>, ConfmergeError> {
    let base = BuildArtifacts::checked(&assembly.files, &assembly.packages, &assembly.origins)?;
    let mut plan = vec![(config.output_dir.clone(), base)];
    for (name, lists) in &assembly.alternatives {
        plan.push((
            config.alternative_output_dir(name),
            BuildArtifacts::checked(lists, &assembly.packages, &assembly.origins)?,
        ));
    }
    Ok(plan)
}

/// Write the base build and every alternative.
pub fn write_assembly<W: ArtifactWriter>(
    writer: &W,
    config: &AssemblyConfig,
    assembly: &Assembly,
) -> Result<Vec<PathBuf>> {
    let mut rendered = Vec::new();
    for (dir, artifacts) in plan_artifacts(config, assembly)? {
        let files = writer
            .render(&artifacts)
            .with_context(|| format!("Failed to render artifacts for {}", dir.display()))?;
        rendered.push((dir, files));
    }

    let mut staged = Vec::new();
    for (dir, files) in &rendered {
        for (name, content) in files {
            staged.push(stage(dir, name, content)?);
        }
    }

    let mut written = Vec::with_capacity(staged.len());
    for file in staged {
        written.push(file.persist()?);
    }
    tracing::debug!("Wrote {} artifacts into {} directories", written.len(), rendered.len());
    Ok(written)
}

fn stage(dir: &Path, name: &str, content: &[u8]) -> Result<StagedFile> {
    StagedFile::stage(&dir.join(name), content)
        .with_context(|| format!("Failed to write artifacts to {}", dir.display()))
}
