//! orgctl - command-line front end for OrgScope
//!
//! Reads a roster file, builds the org hierarchy once and answers one query.

use anyhow::Result;
use clap::Parser;
use orgctl::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    orgctl::logging::init(cli.verbose);
    orgctl::run(&cli)
}
