//! Per-category collection of package contributions.
//!
//! Packages are processed strictly in build order. For every declared category
//! the collector looks up its [`CategoryPolicy`]:
//!
//! - **forward**: entries are appended to the bucket and to the
//!   [`GlobalSequence`], so the root's files come last;
//! - **reversed**: the declared list is reversed and each entry is prepended,
//!   so the root's block ends up first while keeping its internal order.
//!
//! An entry already present in a category's bucket is skipped. References are
//! kept in the bucket for the expander but never recorded in the sequence.

use std::collections::{BTreeMap, HashSet, VecDeque};

use super::order::BuildOrder;
use super::sequence::GlobalSequence;
use crate::config::{AssemblyConfig, CategoryPolicy};
use crate::package::{CategoryFiles, FileEntry, PackageNode};

/// Resolved files one package feeds into a collection.
///
/// Each declaration is processed as a separate batch, so the root's dev files
/// are inserted after (or, for reversed categories, before) its regular files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    /// Contributing package.
    pub package: String,
    /// True for the root package.
    pub is_root: bool,
    /// Declarations with direct paths resolved against the package directory.
    pub declarations: Vec<CategoryFiles>,
}

impl Contribution {
    /// Contribution of `node`: nothing for incomplete packages, files plus dev
    /// files for the root, files only otherwise.
    pub fn from_node(node: &PackageNode) -> Self {
        let mut declarations = Vec::new();
        if node.complete {
            declarations.push(node.files.resolve(&node.root_dir));
            if node.is_root && !node.dev_files.is_empty() {
                declarations.push(node.dev_files.resolve(&node.root_dir));
            }
        } else {
            tracing::debug!("Skipping files of incomplete package {}", node.name);
        }

        Self {
            package: node.name.clone(),
            is_root: node.is_root,
            declarations,
        }
    }

    /// Replace the declarations, keeping the package identity.
    #[must_use]
    pub fn with_declarations(&self, declarations: Vec<CategoryFiles>) -> Self {
        Self {
            package: self.package.clone(),
            is_root: self.is_root,
            declarations,
        }
    }
}

/// Contributions of every ordered package, in build order.
pub fn contributions(packages: &[PackageNode], order: &BuildOrder) -> Vec<Contribution> {
    order
        .iter()
        .filter_map(|entry| packages.iter().find(|p| p.name == entry.name))
        .map(Contribution::from_node)
        .collect()
}

/// Raw collection output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFiles {
    /// Category → entries in bucket order, references not yet expanded.
    pub buckets: BTreeMap<String, Vec<FileEntry>>,
    /// Canonical order of every direct file.
    pub sequence: GlobalSequence,
}

#[derive(Debug, Default)]
struct Bucket {
    entries: VecDeque<FileEntry>,
    seen: HashSet<FileEntry>,
}

/// Builds per-category buckets and the [`GlobalSequence`] for one build.
#[derive(Debug)]
pub struct CategoryFileCollector<'a> {
    config: &'a AssemblyConfig,
    buckets: BTreeMap<String, Bucket>,
    sequence: GlobalSequence,
}

impl<'a> CategoryFileCollector<'a> {
    /// Start an empty collection.
    pub fn new(config: &'a AssemblyConfig) -> Self {
        Self {
            config,
            buckets: BTreeMap::new(),
            sequence: GlobalSequence::new(),
        }
    }

    /// Add one package's contribution.
    pub fn add(&mut self, contribution: &Contribution) {
        for declaration in &contribution.declarations {
            for (category, entries) in declaration.iter() {
                self.add_category(category, entries);
            }
        }
    }

    fn add_category(&mut self, category: &str, entries: &[FileEntry]) {
        let policy = self.config.policy(category);
        let bucket = self.buckets.entry(category.to_string()).or_default();

        let ordered: Vec<&FileEntry> = match policy {
            CategoryPolicy::Forward => entries.iter().collect(),
            CategoryPolicy::Reversed => entries.iter().rev().collect(),
        };

        for entry in ordered {
            if !bucket.seen.insert(entry.clone()) {
                tracing::trace!("Skipping duplicate {entry} in {category}");
                continue;
            }

            match policy {
                CategoryPolicy::Forward => bucket.entries.push_back(entry.clone()),
                CategoryPolicy::Reversed => bucket.entries.push_front(entry.clone()),
            }

            if let FileEntry::DirectPath(file) = entry {
                match policy {
                    CategoryPolicy::Forward => self.sequence.push_back(file.clone()),
                    CategoryPolicy::Reversed => self.sequence.push_front(file.clone()),
                }
            }
        }
    }

    /// Finish the collection.
    pub fn finish(self) -> CollectedFiles {
        CollectedFiles {
            buckets: self
                .buckets
                .into_iter()
                .map(|(category, bucket)| (category, bucket.entries.into()))
                .collect(),
            sequence: self.sequence,
        }
    }

    /// Collect every contribution in order.
    pub fn collect_all(config: &'a AssemblyConfig, contributions: &[Contribution]) -> CollectedFiles {
        let mut collector = Self::new(config);
        for contribution in contributions {
            collector.add(contribution);
        }
        collector.finish()
    }
}
