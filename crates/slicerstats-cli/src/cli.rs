//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Build the download-statistics JSON document from a statistics database.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SQLite database written by the log parser
    pub database: PathBuf,

    /// JSON file to write (overwritten)
    pub output: PathBuf,

    /// TOML configuration file
    #[arg(short, long, env = "SLICERSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Country reference JSON; overrides the configured one
    #[arg(long)]
    pub countries: Option<PathBuf>,

    /// User-agent category to keep; overrides the configured one
    #[arg(long)]
    pub browser_type: Option<String>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}
