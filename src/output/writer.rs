//! Parquet file writer
//!
//! Persists table batches as Parquet files, one file per table.

use crate::denest::TableBatch;
use crate::error::Result;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use super::arrow::batch_to_arrow;

/// Configuration for the Parquet writer
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    /// Use ZSTD compression
    #[must_use]
    pub fn zstd(mut self) -> Self {
        self.compression = Compression::ZSTD(parquet::basic::ZstdLevel::default());
        self
    }

    /// Build writer properties
    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// File name for one table's Parquet output
///
/// `<stream>.parquet` for the root table,
/// `<stream>__<table path joined by __>.parquet` for subtables.
pub(crate) fn table_file_name(stream_name: &str, batch: &TableBatch) -> String {
    if batch.schema.is_root() {
        format!("{stream_name}.parquet")
    } else {
        format!("{stream_name}__{}.parquet", batch.schema.path.table_name())
    }
}

/// Write each table batch to its own Parquet file under `dir`
///
/// Returns the written file paths in batch order. An empty batch still
/// produces a file, so downstream DDL sees every declared table.
pub fn write_table_batches(
    dir: impl AsRef<Path>,
    stream_name: &str,
    batches: &[TableBatch],
    config: &ParquetWriterConfig,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut paths = Vec::with_capacity(batches.len());
    for batch in batches {
        let path = dir.join(table_file_name(stream_name, batch));
        let record_batch = batch_to_arrow(batch)?;

        let file = File::create(&path)?;
        let mut writer =
            ArrowWriter::try_new(file, record_batch.schema(), Some(config.build_properties()))?;
        writer.write(&record_batch)?;
        writer.close()?;

        info!(
            table = %batch.schema.path,
            rows = batch.rows.len(),
            path = %path.display(),
            "wrote table batch"
        );
        paths.push(path);
    }
    Ok(paths)
}
