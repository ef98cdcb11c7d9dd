//! Final ordering of expanded categories.
//!
//! Each category becomes the subsequence of the [`GlobalSequence`] made of
//! exactly the files it contains after expansion. That makes every category
//! agree with one total order and drops duplicates introduced by references.

use std::collections::{BTreeMap, HashSet};

use super::sequence::GlobalSequence;
use crate::package::ConfigFile;

/// Category name → final ordered, de-duplicated files.
pub type CategoryLists = BTreeMap<String, Vec<ConfigFile>>;

/// Order `files` by their position in `sequence`, keeping each file once.
///
/// Files never recorded in the sequence are dropped.
pub fn normalize_category(files: &[ConfigFile], sequence: &GlobalSequence) -> Vec<ConfigFile> {
    let mut seen = HashSet::new();
    let mut positioned: Vec<(i64, &ConfigFile)> = files
        .iter()
        .filter(|file| seen.insert(*file))
        .filter_map(|file| match sequence.position(file) {
            Some(position) => Some((position, file)),
            None => {
                tracing::debug!("{file} is not in the global sequence; dropping it");
                None
            }
        })
        .collect();

    positioned.sort_by_key(|(position, _)| *position);
    positioned.into_iter().map(|(_, file)| file.clone()).collect()
}

/// Normalise every expanded category.
pub fn normalize(
    expanded: &BTreeMap<String, Vec<ConfigFile>>,
    sequence: &GlobalSequence,
) -> CategoryLists {
    expanded
        .iter()
        .map(|(category, files)| (category.clone(), normalize_category(files, sequence)))
        .collect()
}
