//! Command-line interface for confmerge.
//!
//! # Available Commands
//!
//! - `build` - Assemble configuration and write artifacts for the base build
//!   and every alternative
//! - `tree` - Show the build order as an indented, coloured tree
//! - `show` - Print the final category lists of the base build or an alternative
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Suppress all output except errors
//! - `--manifest-path` - Use this confmerge.toml instead of searching upwards
//!
//! ```bash
//! confmerge build
//! confmerge --verbose build --output-dir dist
//! confmerge show --alternative dev --format json
//! confmerge --manifest-path ../app/confmerge.toml tree
//! ```
//!
//! Logging goes to stderr and honours `RUST_LOG` unless `--verbose` or
//! `--quiet` is given.

mod build;
mod common;
mod show;
mod tree;

pub use build::BuildCommand;
pub use common::CommandContext;
pub use show::ShowCommand;
pub use tree::TreeCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Top-level command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "confmerge",
    about = "Assemble ordered configuration file lists from a package dependency graph",
    version,
    author
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging and detailed information.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the manifest file (confmerge.toml).
    ///
    /// By default the current directory and its parents are searched.
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble configuration and write build artifacts
    Build(BuildCommand),
    /// Show the package tree in build order
    Tree(TreeCommand),
    /// Print the final category lists
    Show(ShowCommand),
}

impl Cli {
    /// Log filter implied by the verbosity flags; `None` defers to `RUST_LOG`.
    #[must_use]
    pub fn log_level(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }

    /// Install the stderr tracing subscriber.
    pub fn init_logging(&self) {
        let filter = match self.log_level() {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Execute the selected subcommand.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Build(cmd) => cmd.execute_with_manifest_path(self.manifest_path),
            Commands::Tree(cmd) => cmd.execute_with_manifest_path(self.manifest_path),
            Commands::Show(cmd) => cmd.execute_with_manifest_path(self.manifest_path),
        }
    }
}
