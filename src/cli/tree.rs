//! Display the build order as an indented tree.
//!
//! ```text
//! acme/app dev [params, defines]
//!    acme/lib-b 1.0.0 [params]
//!       acme/lib-a 2.1.0 [params, web]
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::assembly::{DependencyOrderer, find_root};
use crate::tree::render_tree;

/// Command to print the package tree.
#[derive(Args, Debug, Default)]
pub struct TreeCommand {}

impl TreeCommand {
    /// Execute the tree command with an optional manifest path.
    pub fn execute_with_manifest_path(self, manifest_path: Option<PathBuf>) -> Result<()> {
        let ctx = CommandContext::discover(manifest_path)?;
        let packages = ctx.packages()?;
        let root = find_root(&packages)?;

        let order = DependencyOrderer::new(&packages).order(&root.name);
        println!("{}", render_tree(&order, &packages));
        Ok(())
    }
}
