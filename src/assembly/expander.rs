//! Category reference expansion.
//!
//! A `$name` entry splices in the fully expanded contents of category `name`
//! at the referencing position. Expansion is recursive and memoised; an
//! explicit in-progress stack turns reference cycles into
//! [`ConfmergeError::CyclicReference`] instead of unbounded recursion.

use std::collections::{BTreeMap, HashMap};

use crate::core::ConfmergeError;
use crate::package::{ConfigFile, FileEntry};

/// Expands references across a set of category buckets.
pub struct ReferenceExpander<'a> {
    buckets: &'a BTreeMap<String, Vec<FileEntry>>,
    expanded: HashMap<String, Vec<ConfigFile>>,
    in_progress: Vec<String>,
}

impl<'a> ReferenceExpander<'a> {
    /// Create an expander over raw buckets.
    pub fn new(buckets: &'a BTreeMap<String, Vec<FileEntry>>) -> Self {
        Self {
            buckets,
            expanded: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Expand every category.
    ///
    /// Results may still contain duplicates when a category lists a file both
    /// directly and through a reference; normalisation removes them.
    pub fn expand_all(mut self) -> Result<BTreeMap<String, Vec<ConfigFile>>, ConfmergeError> {
        let mut result = BTreeMap::new();
        for category in self.buckets.keys() {
            let files = self.expand(category)?;
            result.insert(category.clone(), files);
        }
        Ok(result)
    }

    /// Expanded files of `category`. Absent categories expand to nothing.
    pub fn expand(&mut self, category: &str) -> Result<Vec<ConfigFile>, ConfmergeError> {
        if let Some(done) = self.expanded.get(category) {
            return Ok(done.clone());
        }

        if self.in_progress.iter().any(|c| c == category) {
            let mut chain = self.in_progress.clone();
            chain.push(category.to_string());
            return Err(ConfmergeError::CyclicReference {
                category: category.to_string(),
                chain: chain.join(" → "),
            });
        }

        let buckets = self.buckets;
        let Some(entries) = buckets.get(category) else {
            tracing::debug!("Reference to undeclared category '{category}' expands to nothing");
            return Ok(Vec::new());
        };

        self.in_progress.push(category.to_string());
        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                FileEntry::DirectPath(file) => files.push(file.clone()),
                FileEntry::CategoryReference(target) => {
                    let spliced = self.expand(target)?;
                    files.extend(spliced);
                }
            }
        }
        self.in_progress.pop();

        self.expanded.insert(category.to_string(), files.clone());
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets(spec: &[(&str, &[&str])]) -> BTreeMap<String, Vec<FileEntry>> {
        spec.iter()
            .map(|(name, entries)| {
                (name.to_string(), entries.iter().map(|e| FileEntry::parse(e)).collect())
            })
            .collect()
    }

    fn paths(files: &[ConfigFile]) -> Vec<String> {
        files.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_reference_spliced_at_position() {
        let raw = buckets(&[("common", &["/a", "/b"]), ("web", &["/w1", "$common", "/w2"])]);
        let expanded = ReferenceExpander::new(&raw).expand_all().unwrap();
        assert_eq!(paths(&expanded["web"]), vec!["/w1", "/a", "/b", "/w2"]);
        assert_eq!(paths(&expanded["common"]), vec!["/a", "/b"]);
    }

    #[test]
    fn test_nested_references() {
        let raw = buckets(&[
            ("base", &["/base"]),
            ("common", &["$base", "/common"]),
            ("web", &["$common", "/web"]),
        ]);
        let expanded = ReferenceExpander::new(&raw).expand_all().unwrap();
        assert_eq!(paths(&expanded["web"]), vec!["/base", "/common", "/web"]);
    }

    #[test]
    fn test_missing_and_empty_categories_expand_to_nothing() {
        let raw = buckets(&[("empty", &[]), ("web", &["$empty", "$ghost", "/w"])]);
        let expanded = ReferenceExpander::new(&raw).expand_all().unwrap();
        assert_eq!(paths(&expanded["web"]), vec!["/w"]);
        assert!(expanded["empty"].is_empty());
    }

    #[test]
    fn test_reference_cycle_is_an_error() {
        let raw = buckets(&[("common", &["$web"]), ("web", &["$common"])]);
        let err = ReferenceExpander::new(&raw).expand_all().unwrap_err();
        assert_eq!(
            err,
            ConfmergeError::CyclicReference {
                category: "common".to_string(),
                chain: "common → web → common".to_string(),
            }
        );
    }

    #[test]
    fn test_self_reference_is_an_error() {
        let raw = buckets(&[("web", &["/w", "$web"])]);
        assert!(matches!(
            ReferenceExpander::new(&raw).expand_all(),
            Err(ConfmergeError::CyclicReference { .. })
        ));
    }

    #[test]
    fn test_diamond_references_are_not_cycles() {
        let raw = buckets(&[
            ("base", &["/base"]),
            ("a", &["$base"]),
            ("b", &["$base"]),
            ("web", &["$a", "$b"]),
        ]);
        let expanded = ReferenceExpander::new(&raw).expand_all().unwrap();
        assert_eq!(paths(&expanded["web"]), vec!["/base", "/base"]);
    }
}
