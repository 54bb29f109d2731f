//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Schema and record denesting engine CLI
#[derive(Parser, Debug)]
#[command(name = "denest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stream definition file (YAML)
    #[arg(short, long, global = true)]
    pub stream: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the flat table schemas derived from the stream definition
    Schema,

    /// Flatten records into table batches
    Flatten {
        /// Input file with newline-delimited JSON records (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory for Parquet files
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Validate a stream definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one table document per line)
    Json,
    /// Parquet files, one per table
    Parquet,
}
