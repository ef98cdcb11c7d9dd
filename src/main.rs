//! confmerge CLI entry point
//!
//! Parses arguments, installs logging, runs the command and renders any
//! error with its context and suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use confmerge::cli;
use confmerge::core::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    cli.init_logging();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
