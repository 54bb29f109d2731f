//! Output module
//!
//! The destination-writer side of the engine: converts flattened table
//! batches to Arrow RecordBatches and persists them as Parquet files.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Building Arrow schemas from denested table schemas
//! - Converting table batches to Arrow RecordBatches
//! - Writing one Parquet file per table

mod arrow;
mod writer;

pub use arrow::{arrow_schema, batch_to_arrow};
pub use writer::{write_table_batches, ParquetWriterConfig};
