//! orgctl library - exposes modules for testing
//!
//! The binary is a thin wrapper: parse, init logging, `run`.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;

use anyhow::Result;
use cli::Cli;
use output::Palette;
use std::io::IsTerminal;

/// Execute a parsed command and print the result to stdout
pub fn run(cli: &Cli) -> Result<()> {
    let palette = Palette::new(!cli.json && std::io::stdout().is_terminal());
    let rendered = commands::execute(cli, palette)?;
    println!("{}", rendered);
    Ok(())
}
