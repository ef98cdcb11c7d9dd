//! Assemble configuration and write build artifacts.
//!
//! # Examples
//!
//! ```bash
//! confmerge build
//! confmerge build --output-dir dist
//! confmerge build --dry-run
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::output::{JsonArtifactWriter, plan_artifacts, write_assembly};

/// Command to run the assembly pipeline.
#[derive(Args, Debug, Default)]
pub struct BuildCommand {
    /// Write artifacts here instead of the configured output directory
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Compute everything but write nothing
    #[arg(long)]
    dry_run: bool,
}

impl BuildCommand {
    /// Execute the build command with an optional manifest path.
    pub fn execute_with_manifest_path(self, manifest_path: Option<PathBuf>) -> Result<()> {
        let mut ctx = CommandContext::discover(manifest_path)?;
        ctx.override_output_dir(self.output_dir.as_deref());

        let packages = ctx.packages()?;
        let assembly = ctx.assemble(&packages)?;

        let categories = assembly.files.len();
        let files: usize = assembly.files.values().map(Vec::len).sum();

        if self.dry_run {
            for (dir, artifacts) in plan_artifacts(&ctx.config, &assembly)? {
                println!(
                    "{} {} ({} categories)",
                    "Would write".yellow(),
                    dir.display(),
                    artifacts.files.len()
                );
            }
            return Ok(());
        }

        write_assembly(&JsonArtifactWriter, &ctx.config, &assembly)?;

        println!(
            "{} {} packages, {} files in {} categories, {} alternatives → {}",
            "Assembled".green().bold(),
            assembly.build_order.len(),
            files,
            categories,
            assembly.alternatives.len(),
            ctx.config.output_dir.display()
        );
        Ok(())
    }
}
