//! confmerge - configuration file assembly over a package dependency graph
//!
//! Every package in a project may contribute configuration files to named
//! categories (`params`, `defines`, `web`, ...). confmerge computes one
//! reproducible build order over the possibly cyclic dependency graph, merges
//! the contributions per category and writes ordered file lists that a runtime
//! loads in sequence.
//!
//! # Pipeline
//!
//! 1. [`provider`] loads the root manifest and every installed package
//! 2. [`assembly::order`] computes the build order: dependencies first, root last
//! 3. [`assembly::collector`] fills per-category buckets; most categories are
//!    merged forward (root last), priority-reversed ones root first
//! 4. [`assembly::expander`] splices `$category` references
//! 5. [`assembly::normalizer`] orders every category by one global sequence
//! 6. [`assembly::alternatives`] repeats 3-5 for each named alternative
//! 7. [`output`] writes `files.json`, `packages.json` and `aliases.json`
//!
//! # Modules
//!
//! - [`assembly`] - the ordering and merging engine
//! - [`cli`] - `build`, `tree` and `show` subcommands
//! - [`config`] - layered assembly settings
//! - [`core`] - error types and user-facing error rendering
//! - [`manifest`] - `confmerge.toml` parsing and discovery
//! - [`output`] - artifact writers
//! - [`package`] - package nodes and declared file entries
//! - [`provider`] - package graph sources
//! - [`reader`] - TOML/JSON/YAML readers for external alternative definitions
//! - [`tree`] - build order report
//! - [`utils`] - filesystem helpers
//!
//! # Manifest
//!
//! ```toml
//! [package]
//! name = "acme/app"
//! require = ["acme/lib-a"]
//!
//! [files]
//! params = ["config/params.php"]
//! defines = "config/defines.php"
//! web = ["$common", "config/web.php"]
//!
//! [dev-files]
//! params = "?config/params-local.php"
//!
//! [alternatives.prod]
//! params = "config/params-prod.php"
//! ```
//!
//! # Library use
//!
//! ```rust
//! use confmerge::assembly::Assembler;
//! use confmerge::config::AssemblyConfig;
//! use confmerge::package::{CategoryFiles, PackageNode};
//! use std::path::Path;
//!
//! let packages = vec![
//!     PackageNode::new("app", "/app")
//!         .root()
//!         .with_requires(["lib"])
//!         .with_files(CategoryFiles::new().with("params", ["params.php"])),
//!     PackageNode::new("lib", "/vendor/lib")
//!         .with_files(CategoryFiles::new().with("params", ["params.php"])),
//! ];
//!
//! let assembly = Assembler::new(AssemblyConfig::defaults(Path::new("/app")))
//!     .assemble(&packages)
//!     .unwrap();
//! assert_eq!(assembly.build_order.names(), vec!["lib", "app"]);
//! assert_eq!(assembly.files["params"].len(), 2);
//! ```

pub mod assembly;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod manifest;
pub mod output;
pub mod package;
pub mod provider;
pub mod reader;
pub mod tree;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
