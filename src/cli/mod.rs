//! CLI module
//!
//! Command-line interface for the denesting engine.
//!
//! # Commands
//!
//! - `schema` - Print the flat table schemas derived from a stream definition
//! - `flatten` - Flatten records into table batches (JSON or Parquet output)
//! - `validate` - Check a stream definition for configuration errors

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
