//! Print the final category lists without writing anything.
//!
//! # Examples
//!
//! ```bash
//! confmerge show
//! confmerge show --alternative dev
//! confmerge show --format json
//! ```
//!
//! Optional files keep their `?` marker in the output.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::common::CommandContext;
use crate::assembly::CategoryLists;

/// Command to show assembled lists.
#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Show the lists of this alternative instead of the base build
    #[arg(short = 'a', long)]
    alternative: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text")]
    format: String,
}

impl ShowCommand {
    /// Execute the show command with an optional manifest path.
    pub fn execute_with_manifest_path(self, manifest_path: Option<PathBuf>) -> Result<()> {
        self.validate_arguments()?;

        let ctx = CommandContext::discover(manifest_path)?;
        let packages = ctx.packages()?;
        let assembly = ctx.assemble(&packages)?;
        let lists = assembly.lists(self.alternative.as_deref())?;

        match self.format.as_str() {
            "json" => println!("{}", serde_json::to_string_pretty(&as_strings(lists))?),
            _ => print!("{}", render_text(lists)),
        }
        Ok(())
    }

    fn validate_arguments(&self) -> Result<()> {
        match self.format.as_str() {
            "text" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid format '{}'. Valid formats are: text, json",
                self.format
            )),
        }
    }
}

fn as_strings(lists: &CategoryLists) -> BTreeMap<&str, Vec<String>> {
    lists
        .iter()
        .map(|(category, files)| {
            (category.as_str(), files.iter().map(ToString::to_string).collect())
        })
        .collect()
}

fn render_text(lists: &CategoryLists) -> String {
    let mut out = String::new();
    for (category, files) in lists {
        out.push_str(&format!("{}\n", category.cyan().bold()));
        for file in files {
            out.push_str(&format!("  {file}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ConfigFile;

    fn command(format: &str) -> ShowCommand {
        ShowCommand {
            alternative: None,
            format: format.to_string(),
        }
    }

    #[test]
    fn test_validate_arguments() {
        assert!(command("text").validate_arguments().is_ok());
        assert!(command("json").validate_arguments().is_ok());
        let err = command("yaml").validate_arguments().unwrap_err();
        assert!(err.to_string().contains("Invalid format"));
    }

    #[test]
    fn test_optional_marker_kept() {
        let mut lists = CategoryLists::new();
        lists.insert(
            "params".to_string(),
            vec![ConfigFile::required("/a.php"), ConfigFile::optional("/b.php")],
        );
        assert_eq!(as_strings(&lists)["params"], vec!["/a.php", "?/b.php"]);
        assert!(render_text(&lists).contains("  ?/b.php\n"));
    }
}
