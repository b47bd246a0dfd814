//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default pacing interval between lookup starts, in milliseconds.
pub const DEFAULT_PACING_MS: u64 = 1500;

/// Largest accepted pacing interval, in milliseconds.
pub const MAX_PACING_MS: u64 = 60_000;

/// Resolve chemical identifiers into molecular property tables.
///
/// Chemly reads compound names, PubChem CIDs, and SMILES strings separated by
/// `|`, newlines, tabs, or commas, looks each one up in PubChem at a polite pace,
/// and writes a table of molecular properties.
#[derive(Parser, Debug, Clone)]
#[command(name = "chemly")]
#[command(author, version, about)]
pub struct Args {
    /// Input files with identifiers (.txt, .csv, .tsv); reads stdin when omitted
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Write the result table to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format for the result table
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    pub format: OutputFormat,

    /// Minimum delay between lookup starts in milliseconds (1500-60000)
    #[arg(short = 'l', long, default_value_t = DEFAULT_PACING_MS, value_parser = clap::value_parser!(u64).range(1500..=60000))]
    pub pacing_ms: u64,

    /// Parallel lookup workers (1-4); all workers share the same pacing
    #[arg(short = 'c', long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub concurrency: u8,

    /// Save a 3D SDF structure file for each resolved compound into DIR
    #[arg(long, value_name = "DIR")]
    pub structures: Option<PathBuf>,

    /// Only save structures for these compounds (CIDs or names, comma-separated)
    #[arg(long, value_name = "ID", value_delimiter = ',', requires = "structures")]
    pub structures_for: Vec<String>,

    /// PubChem PUG-REST base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}

/// Result table rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated values with a header row
    Tsv,
    /// JSON array of records
    Json,
}
