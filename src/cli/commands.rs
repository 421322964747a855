//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse the most starred repositories for a language
#[derive(Parser, Debug)]
#[command(name = "superstars")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API token (falls back to GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Language filter
    #[arg(short, long, global = true)]
    pub language: Option<String>,

    /// Items per page (1-100)
    #[arg(long, global = true)]
    pub per_page: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load pages of search results and print them
    List {
        /// Number of pages to load
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Look up owner display names
        #[arg(long)]
        owners: bool,
    },

    /// Show the rate limit reported by the search endpoint
    RateLimit,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one item per line)
    Json,
    /// Human-readable output
    Pretty,
}
