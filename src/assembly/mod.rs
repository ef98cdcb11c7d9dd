//! The configuration assembly pipeline.
//!
//! ```text
//! packages ─▶ DependencyOrderer ─▶ CategoryFileCollector ─▶ ReferenceExpander ─▶ OrderNormalizer
//!                  │                        │
//!                  │                        └─ recorded contributions ─▶ AlternativeBuildPlanner
//!                  └─ BuildOrder (tree report, package metadata)
//! ```
//!
//! [`Assembler::assemble`] runs the whole pipeline once for the base build and
//! once per alternative. Alternatives are resolved before any collection
//! happens, so a broken declaration or unreadable definition file aborts the
//! run with nothing computed. Any error aborts everything: callers get either a
//! complete [`Assembly`] or nothing.

pub mod alternatives;
pub mod collector;
pub mod expander;
pub mod normalizer;
pub mod order;
pub mod sequence;

pub use alternatives::AlternativeBuildPlanner;
pub use collector::{CategoryFileCollector, CollectedFiles, Contribution, contributions};
pub use expander::ReferenceExpander;
pub use normalizer::{CategoryLists, normalize, normalize_category};
pub use order::{BuildOrder, DependencyOrderer, EdgeKind, OrderedPackage};
pub use sequence::GlobalSequence;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::AssemblyConfig;
use crate::core::ConfmergeError;
use crate::package::{
    AlternativeSpec, AlternativesDecl, CategoryFiles, FileEntry, PackageMetadata, PackageNode,
};
use crate::reader::{ExtensionReader, FormatReader};

/// Result of one complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Packages in build order.
    pub build_order: BuildOrder,
    /// Final lists of the base build.
    pub files: CategoryLists,
    /// Final lists per alternative, in name order.
    pub alternatives: BTreeMap<String, CategoryLists>,
    /// Metadata of every ordered package, in build order.
    pub packages: Vec<PackageMetadata>,
    /// Declaring package of every direct file, first declaration in build
    /// order wins. Alternative overrides are attributed to the root.
    pub origins: BTreeMap<PathBuf, String>,
}

impl Assembly {
    /// Lists of the base build, or of the named alternative.
    pub fn lists(&self, alternative: Option<&str>) -> Result<&CategoryLists, ConfmergeError> {
        match alternative {
            None => Ok(&self.files),
            Some(name) => {
                self.alternatives.get(name).ok_or_else(|| ConfmergeError::UnknownAlternative {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// Runs the assembly pipeline with a given configuration and definition reader.
#[derive(Debug, Clone)]
pub struct Assembler<R = ExtensionReader> {
    config: AssemblyConfig,
    reader: R,
}

impl Assembler<ExtensionReader> {
    /// Assembler reading external definitions by file extension.
    pub fn new(config: AssemblyConfig) -> Self {
        Self::with_reader(config, ExtensionReader)
    }
}

impl<R: FormatReader> Assembler<R> {
    /// Assembler with a custom definition reader.
    pub fn with_reader(config: AssemblyConfig, reader: R) -> Self {
        Self {
            config,
            reader,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Load the root's alternatives, reading an external file if declared.
    ///
    /// # Errors
    ///
    /// Read failures are attributed to the root package.
    pub fn resolve_alternatives(
        &self,
        root: &PackageNode,
    ) -> Result<Vec<AlternativeSpec>, ConfmergeError> {
        let set = match &root.alternatives {
            None => return Ok(Vec::new()),
            Some(AlternativesDecl::Inline(set)) => set.clone(),
            Some(AlternativesDecl::External(path)) => {
                let path = root.prepare_path(path);
                tracing::debug!("Reading alternatives from {}", path.display());
                self.reader.read(&path).map_err(|e| e.for_package(&root.name))?
            }
        };
        let specs = AlternativeSpec::from_set(set);
        for spec in &specs {
            AlternativeSpec::check_name(&spec.name).map_err(|reason| {
                ConfmergeError::InvalidAlternatives {
                    package: root.name.clone(),
                    reason,
                }
            })?;
        }
        Ok(specs)
    }

    /// Run the base build and every alternative.
    ///
    /// # Errors
    ///
    /// - [`ConfmergeError::ManifestValidationError`] unless exactly one root is present
    /// - alternatives read failures
    /// - [`ConfmergeError::InvalidAlternatives`] for unusable alternative names
    /// - [`ConfmergeError::CyclicReference`] from any build
    pub fn assemble(&self, packages: &[PackageNode]) -> Result<Assembly, ConfmergeError> {
        let root = find_root(packages)?;
        let specs = self.resolve_alternatives(root)?;

        let build_order = DependencyOrderer::new(packages).order(&root.name);
        tracing::debug!("Build order: {}", build_order.names().join(", "));

        let contributions = contributions(packages, &build_order);
        let files = build_lists(&self.config, &contributions)?;

        let alternatives = AlternativeBuildPlanner::new(&self.config, &contributions, &root.root_dir)
            .plan_all(&specs)?;

        let mut origins = BTreeMap::new();
        for contribution in &contributions {
            for declaration in &contribution.declarations {
                record_origins(&mut origins, declaration, &contribution.package);
            }
        }
        for spec in &specs {
            record_origins(&mut origins, &spec.files.resolve(&root.root_dir), &root.name);
        }

        let packages = build_order
            .iter()
            .filter_map(|entry| packages.iter().find(|p| p.name == entry.name))
            .map(PackageNode::metadata)
            .collect();

        Ok(Assembly {
            build_order,
            files,
            alternatives,
            packages,
            origins,
        })
    }
}

/// The single root package.
pub fn find_root(packages: &[PackageNode]) -> Result<&PackageNode, ConfmergeError> {
    let mut roots = packages.iter().filter(|p| p.is_root);
    match (roots.next(), roots.next()) {
        (Some(root), None) => Ok(root),
        (None, _) => Err(ConfmergeError::ManifestValidationError {
            reason: "no root package".to_string(),
        }),
        (Some(first), Some(second)) => Err(ConfmergeError::ManifestValidationError {
            reason: format!("more than one root package: {} and {}", first.name, second.name),
        }),
    }
}

fn record_origins(origins: &mut BTreeMap<PathBuf, String>, files: &CategoryFiles, package: &str) {
    for (_, entries) in files.iter() {
        for entry in entries {
            if let FileEntry::DirectPath(file) = entry {
                origins.entry(file.path.clone()).or_insert_with(|| package.to_string());
            }
        }
    }
}

/// Collect, expand and normalise one set of contributions.
pub(crate) fn build_lists(
    config: &AssemblyConfig,
    contributions: &[Contribution],
) -> Result<CategoryLists, ConfmergeError> {
    let collected = CategoryFileCollector::collect_all(config, contributions);
    let expanded = ReferenceExpander::new(&collected.buckets).expand_all()?;
    Ok(normalize(&expanded, &collected.sequence))
}
