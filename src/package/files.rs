//! Declared configuration file entries.
//!
//! Packages declare their files per category as strings. Each string is parsed
//! once into a [`FileEntry`]:
//!
//! | Declared | Entry |
//! |---|---|
//! | `$common` | [`FileEntry::CategoryReference`] to category `common` |
//! | `?config/local.php` | optional [`FileEntry::DirectPath`] |
//! | `config/params.php` | required [`FileEntry::DirectPath`] |
//!
//! A category value may be a single string or a list of strings, in any of the
//! supported formats. Category order inside one declaration is preserved.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::normalize_path;

const REFERENCE_PREFIX: char = '$';
const OPTIONAL_PREFIX: char = '?';

/// A single configuration file, identified by path and optionality.
///
/// `?a` and `a` are distinct files for deduplication and ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ConfigFile {
    /// Declared path, absolute once resolved against a package directory.
    pub path: PathBuf,
    /// Skipped by the artifact writer when the file does not exist.
    pub optional: bool,
}

impl ConfigFile {
    /// A required file.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            optional: false,
        }
    }

    /// An optional file.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            optional: true,
        }
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{OPTIONAL_PREFIX}")?;
        }
        write!(f, "{}", self.path.display())
    }
}

/// One entry of a category's declared file list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileEntry {
    /// A file path, relative to the declaring package until resolved.
    DirectPath(ConfigFile),
    /// Splice in the fully expanded contents of another category.
    CategoryReference(String),
}

impl FileEntry {
    /// Parse a declared string.
    ///
    /// ```rust
    /// use confmerge::package::FileEntry;
    ///
    /// assert_eq!(FileEntry::parse("$common"), FileEntry::CategoryReference("common".into()));
    /// assert!(matches!(FileEntry::parse("?local.php"), FileEntry::DirectPath(f) if f.optional));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if let Some(name) = raw.strip_prefix(REFERENCE_PREFIX) {
            Self::CategoryReference(name.to_string())
        } else if let Some(path) = raw.strip_prefix(OPTIONAL_PREFIX) {
            Self::DirectPath(ConfigFile::optional(path))
        } else {
            Self::DirectPath(ConfigFile::required(raw))
        }
    }

    /// Resolve a direct path against `base`; references are returned unchanged.
    ///
    /// Absolute paths are only normalised.
    pub fn resolve(&self, base: &Path) -> Self {
        match self {
            Self::DirectPath(file) => Self::DirectPath(ConfigFile {
                path: resolve_path(base, &file.path),
                optional: file.optional,
            }),
            Self::CategoryReference(_) => self.clone(),
        }
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectPath(file) => write!(f, "{file}"),
            Self::CategoryReference(name) => write!(f, "{REFERENCE_PREFIX}{name}"),
        }
    }
}

/// Join `path` to `base` unless it is already absolute, then normalise.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Ordered mapping from category name to declared entries.
///
/// Keeps categories in declaration order; inserting an existing category
/// replaces its entries in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFiles {
    entries: Vec<(String, Vec<FileEntry>)>,
}

impl CategoryFiles {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion from declared strings, mainly for tests and fixtures.
    #[must_use]
    pub fn with<I, S>(mut self, category: &str, declared: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = declared.into_iter().map(|s| FileEntry::parse(s.as_ref())).collect();
        self.insert(category, entries);
        self
    }

    /// Set the entries of `category`.
    pub fn insert(&mut self, category: &str, entries: Vec<FileEntry>) {
        if let Some((_, existing)) = self.entries.iter_mut().find(|(name, _)| name == category) {
            *existing = entries;
        } else {
            self.entries.push((category.to_string(), entries));
        }
    }

    /// Entries of `category`, if declared.
    pub fn get(&self, category: &str) -> Option<&[FileEntry]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, entries)| entries.as_slice())
    }

    /// Iterate categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FileEntry])> {
        self.entries.iter().map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of declared categories.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no category is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every direct path against `base`.
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(name, entries)| {
                    (name.clone(), entries.iter().map(|e| e.resolve(base)).collect())
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for CategoryFiles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CategoryFilesVisitor;

        impl<'de> Visitor<'de> for CategoryFilesVisitor {
            type Value = CategoryFiles;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of category name to a path or a list of paths")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut files = CategoryFiles::new();
                while let Some((category, value)) = map.next_entry::<String, OneOrMany>()? {
                    let declared = match value {
                        OneOrMany::One(path) => vec![path],
                        OneOrMany::Many(paths) => paths,
                    };
                    if declared.iter().any(String::is_empty) {
                        return Err(de::Error::custom(format!(
                            "category '{category}' contains an empty path"
                        )));
                    }
                    files.insert(&category, declared.iter().map(|s| FileEntry::parse(s)).collect());
                }
                Ok(files)
            }
        }

        deserializer.deserialize_map(CategoryFilesVisitor)
    }
}
