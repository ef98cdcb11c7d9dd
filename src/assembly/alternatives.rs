//! Alternative builds.
//!
//! An alternative replays the base build's recorded contributions in build
//! order, with the root's contribution replaced by the alternative's override
//! files. The graph is not traversed again. Each alternative gets its own
//! collector and sequence, so nothing leaks between builds.

use std::collections::BTreeMap;
use std::path::Path;

use super::build_lists;
use super::collector::Contribution;
use super::normalizer::CategoryLists;
use crate::config::AssemblyConfig;
use crate::core::ConfmergeError;
use crate::package::AlternativeSpec;

/// Plans alternative builds on top of recorded base contributions.
pub struct AlternativeBuildPlanner<'a> {
    config: &'a AssemblyConfig,
    contributions: &'a [Contribution],
    root_dir: &'a Path,
}

impl<'a> AlternativeBuildPlanner<'a> {
    /// `root_dir` resolves the override files.
    pub fn new(
        config: &'a AssemblyConfig,
        contributions: &'a [Contribution],
        root_dir: &'a Path,
    ) -> Self {
        Self {
            config,
            contributions,
            root_dir,
        }
    }

    /// Contributions with the root's replaced by `spec`'s files.
    pub fn contributions_for(&self, spec: &AlternativeSpec) -> Vec<Contribution> {
        let overrides = spec.files.resolve(self.root_dir);
        self.contributions
            .iter()
            .map(|contribution| {
                if contribution.is_root {
                    contribution.with_declarations(vec![overrides.clone()])
                } else {
                    contribution.clone()
                }
            })
            .collect()
    }

    /// Final category lists of one alternative.
    pub fn plan(&self, spec: &AlternativeSpec) -> Result<CategoryLists, ConfmergeError> {
        tracing::debug!("Planning alternative '{}'", spec.name);
        build_lists(self.config, &self.contributions_for(spec))
    }

    /// Plan every alternative, failing on the first error.
    pub fn plan_all(
        &self,
        specs: &[AlternativeSpec],
    ) -> Result<BTreeMap<String, CategoryLists>, ConfmergeError> {
        let mut planned = BTreeMap::new();
        for spec in specs {
            planned.insert(spec.name.clone(), self.plan(spec)?);
        }
        Ok(planned)
    }
}
