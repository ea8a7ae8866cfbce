//! A3: command-line surface, mirroring the shared flags and the
//! `find`/`dups`/`tree` subcommands one-for-one.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

const DEFAULT_DATABASE: &str = "/var/lib/mlocate/mlocate.db";

#[derive(Debug, Parser)]
#[command(name = "mlex", about = "Explore filesystems through an mlocate database")]
pub struct Cli {
    /// Name of the mlocate database.
    #[arg(short = 'd', long, default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    #[arg(short = 'L', long, default_value = "WARNING")]
    pub log_level: String,

    /// Show active options, then continue.
    #[arg(short = 'C', long)]
    pub app_config: bool,

    /// Dry run, don't parse database.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Patterns are given as regular expressions. Default: false (glob).
    #[arg(short = 'r', long)]
    pub use_regexps: bool,

    /// Case-insensitive pattern matching.
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Print mlocate database settings.
    #[arg(short = 'D', long)]
    pub mdb_settings: bool,

    /// Maximum directory entries read from db. 0 = unlimited.
    #[arg(short = 'I', long, default_value_t = 0)]
    pub limit_input_dirs: usize,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find files by pattern, list them grouped by directory.
    Find {
        /// Maximum count of selected directories. 0 = unlimited.
        #[arg(short = 'M', long, default_value_t = 0)]
        limit_output_dirs: usize,

        /// Maximum count of selected entries. 0 = unlimited.
        #[arg(short = 'm', long, default_value_t = 0)]
        limit_output_match: usize,

        /// What to do with matched directories.
        #[arg(short = 'a', long, value_enum, default_value_t = Action::List)]
        action: Action,

        /// Select only directories with entries matching those patterns.
        patterns: Vec<String>,
    },

    /// Detect potential duplicate directory trees.
    Dups {
        /// Restrict duplicate detection to directories matching these selectors.
        dir_selectors: Vec<String>,
    },

    /// Print selected subtrees.
    Tree {
        /// Maximum count of selected directories. 0 = unlimited.
        #[arg(short = 'M', long, default_value_t = 0)]
        limit_output_dirs: usize,

        /// Maximum rendering depth. 0 = unlimited.
        #[arg(short = 'l', long, default_value_t = 0)]
        depth: usize,

        /// Select only subtrees rooted at directories matching those patterns.
        patterns: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Test,
    Count,
    List,
    Json,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::Test => "test",
            Action::Count => "count",
            Action::List => "list",
            Action::Json => "json",
        };
        f.write_str(s)
    }
}
