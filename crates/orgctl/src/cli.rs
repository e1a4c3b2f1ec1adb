//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// OrgScope CLI
#[derive(Debug, Parser)]
#[command(name = "orgctl")]
#[command(about = "OrgScope - org hierarchy, reporting lines and role scopes", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Roster JSON file (overrides [roster] path from config)
    #[arg(long, global = true)]
    pub roster: Option<PathBuf>,

    /// Config file (overrides $ORGSCOPE_CONFIG and ./orgscope.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output JSON only
    #[arg(long, global = true)]
    pub json: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the reporting forest
    Tree {
        /// Group employees by level instead of nesting them
        #[arg(long, conflicts_with = "root")]
        leveled: bool,

        /// Only the team under this employee (identity or unique name)
        #[arg(long)]
        root: Option<String>,
    },

    /// Resolve who a role/actor pair may see
    Scope {
        /// hr, leader or manager
        #[arg(long)]
        role: String,

        /// Viewer identity or unique name
        #[arg(long)]
        actor: Option<String>,

        /// Department used when a leader is not in the hierarchy
        #[arg(long)]
        department: Option<String>,
    },

    /// List the people reporting to an employee
    Reports {
        /// Employee identity or unique name
        actor: String,

        /// Direct reports only
        #[arg(long)]
        direct: bool,
    },

    /// Show data-quality findings from the hierarchy build
    Anomalies,

    /// List active employees
    List {
        /// Only this level (e.g. l3)
        #[arg(long)]
        level: Option<String>,

        /// Case-insensitive match on name or designation
        #[arg(long)]
        search: Option<String>,
    },

    /// Headcount per level within a role scope
    Mix {
        /// hr, leader or manager
        #[arg(long)]
        role: String,

        /// Viewer identity or unique name
        #[arg(long)]
        actor: Option<String>,

        /// Department used when a leader is not in the hierarchy
        #[arg(long)]
        department: Option<String>,

        /// Count age bands instead of levels
        #[arg(long)]
        age: bool,
    },
}
