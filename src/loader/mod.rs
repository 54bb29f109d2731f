//! Stream definition loader
//!
//! Parse stream definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `StreamDefinition` - a stream's name, business keys, and schema
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_stream, load_stream_from_str};
pub use types::StreamDefinition;

#[cfg(test)]
mod tests;
