// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Denest
//!
//! A schema and record denesting engine: turns nested JSON records and
//! their schema into flat relational table batches.
//!
//! ## Features
//!
//! - **Schema denesting**: Flatten a nested JSON schema into a root table
//!   schema plus one schema per nested array
//! - **Record denesting**: Flatten records in lock step with the schema,
//!   bucketing rows by table
//! - **Synthetic keys**: Inherited source keys, sequence numbers, and
//!   per-depth array indices link subtable rows back to their parents
//! - **Arrow output**: Native Arrow `RecordBatch` conversion with Parquet
//!   file writing, one file per table
//!
//! ## Quick Start
//!
//! ```rust
//! use denest::denest::to_table_batches;
//! use denest::SchemaNode;
//! use serde_json::json;
//!
//! let schema: SchemaNode = serde_json::from_value(json!({
//!     "type": "object",
//!     "properties": {
//!         "id": {"type": "integer"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     }
//! }))?;
//!
//! let records = vec![json!({"id": 1, "tags": ["a", "b"]})];
//! let batches = to_table_batches(&schema, &["id".to_string()], &records)?;
//!
//! // One batch for the root table, one for the "tags" subtable
//! assert_eq!(batches.len(), 2);
//! # Ok::<(), denest::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    to_table_batches                      │
//! │  schema + key_properties + records → Vec<TableBatch>     │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────┬───────────┴────────────┬──────────────────┐
//! │    Schema    │        Records         │      Output      │
//! ├──────────────┼────────────────────────┼──────────────────┤
//! │ denest_schema│ denest_records         │ Arrow            │
//! │ TableSchema  │ FlattenedRow           │ Parquet          │
//! │ TablePath    │ propagation context    │                  │
//! └──────────────┴────────────────────────┴──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the denesting engine
pub mod error;

/// Common types and type aliases
pub mod types;

/// JSON schema model (type sets, shapes, nodes)
pub mod schema;

/// Schema and record denesting
pub mod denest;

/// YAML loader for stream definitions
pub mod loader;

/// Arrow/Parquet output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use denest::to_table_batches;
pub use loader::{load_stream, load_stream_from_str, StreamDefinition};
pub use schema::{JsonType, SchemaNode, Shape, TypeSet};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
