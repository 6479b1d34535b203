use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "importcop",
    version,
    about = "Import-order linter for JavaScript and TypeScript"
)]
pub struct Args {
    /// Files or directories to lint
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to configuration file (default: .importcop.json)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Apply corrections to files in place
    #[arg(long)]
    pub fix: bool,

    /// Read source from stdin, use PATH for display purposes
    #[arg(long, value_name = "PATH")]
    pub stdin: Option<PathBuf>,

    /// Print files that would be linted, then exit
    #[arg(short = 'L', long)]
    pub list_target_files: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}
