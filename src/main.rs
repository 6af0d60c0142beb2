//! # mzXML Tool
//!
//! A command-line tool for inspecting, re-serializing and validating mzXML
//! files.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize a run
//! mzxml info input.mzXML
//!
//! # Re-write any schema revision as mzXML 2.0
//! mzxml convert input.mzXML output.mzXML
//!
//! # Check a run for consistency problems
//! mzxml validate input.mzXML
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
