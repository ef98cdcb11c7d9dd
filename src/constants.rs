//! Global constants used throughout the confmerge codebase.
//!
//! File names, default directories and environment variable names are defined
//! here so that the manifest loader, provider, writer and CLI agree on them.

/// File name of every package manifest.
pub const MANIFEST_FILE: &str = "confmerge.toml";

/// Default artifact directory, relative to the root package.
pub const DEFAULT_OUTPUT_DIR: &str = "config/build";

/// Default directory holding installed packages, relative to the root package.
pub const DEFAULT_VENDOR_DIR: &str = "vendor";

/// Category placed root-first when the manifest does not configure any.
pub const DEFAULT_PRIORITY_REVERSED: &[&str] = &["defines"];

/// Artifact holding the final per-category file lists.
pub const FILES_ARTIFACT: &str = "files.json";

/// Artifact holding per-package registration metadata.
pub const PACKAGES_ARTIFACT: &str = "packages.json";

/// Artifact holding the merged alias map.
pub const ALIASES_ARTIFACT: &str = "aliases.json";

/// Overrides the configured output directory.
pub const ENV_OUTPUT_DIR: &str = "CONFMERGE_OUTPUT_DIR";

/// Overrides the configured vendor directory.
pub const ENV_VENDOR_DIR: &str = "CONFMERGE_VENDOR_DIR";

/// Number of colours cycled through by the tree report.
pub const TREE_COLOR_COUNT: usize = 6;

/// Indentation per depth level in the tree report.
pub const TREE_INDENT: &str = "   ";
