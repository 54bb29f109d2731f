//! Arrow conversion for table batches
//!
//! Builds Arrow schemas from denested table schemas and converts flattened
//! rows into RecordBatches, column by column in schema property order.

use crate::denest::{FlattenedRow, PropertyPath, TableBatch};
use crate::error::{Error, Result};
use crate::schema::{JsonType, SchemaNode};
use crate::types::JsonValue;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Map a flattened column's schema node to an Arrow data type
///
/// Strings, and bookkeeping-only columns with no literal type left, fall
/// back to Utf8.
fn data_type_for(node: &SchemaNode) -> DataType {
    match node.types.primary_literal() {
        Some(JsonType::Integer) => DataType::Int64,
        Some(JsonType::Number) => DataType::Float64,
        Some(JsonType::Boolean) => DataType::Boolean,
        _ => DataType::Utf8,
    }
}

/// Arrow schema for one table batch
///
/// Columns appear in schema property order, named by their finalized
/// `__`-joined column names. Every column is nullable: null omission means
/// any cell may be absent from any row.
pub fn arrow_schema(batch: &TableBatch) -> Schema {
    let fields: Vec<Field> = batch
        .schema
        .properties
        .iter()
        .map(|(path, node)| Field::new(path.column_name(), data_type_for(node), true))
        .collect();
    Schema::new(fields)
}

/// Convert one table batch into an Arrow RecordBatch
///
/// Cells absent from a row become nulls; row columns the table schema
/// does not declare are ignored.
pub fn batch_to_arrow(batch: &TableBatch) -> Result<RecordBatch> {
    let schema = Arc::new(arrow_schema(batch));

    if batch.rows.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.schema.properties.len());
    for (path, node) in &batch.schema.properties {
        columns.push(build_column(&batch.rows, path, &data_type_for(node)));
    }

    RecordBatch::try_new(schema, columns).map_err(Error::from)
}

/// Build one Arrow array from the rows' cells at the given tuple path
fn build_column(rows: &[FlattenedRow], path: &PropertyPath, data_type: &DataType) -> ArrayRef {
    match data_type {
        DataType::Boolean => {
            let arr: BooleanArray = rows
                .iter()
                .map(|row| row.get(path).and_then(|cell| cell.value.as_bool()))
                .collect();
            Arc::new(arr)
        }

        DataType::Int64 => {
            let arr: Int64Array = rows
                .iter()
                .map(|row| row.get(path).and_then(|cell| cell.value.as_i64()))
                .collect();
            Arc::new(arr)
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = rows
                .iter()
                .map(|row| {
                    row.get(path).and_then(|cell| {
                        cell.value
                            .as_f64()
                            .or_else(|| cell.value.as_i64().map(|i| i as f64))
                    })
                })
                .collect();
            Arc::new(arr)
        }

        _ => {
            let arr: StringArray = rows
                .iter()
                .map(|row| {
                    row.get(path).map(|cell| match &cell.value {
                        JsonValue::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                })
                .collect();
            Arc::new(arr)
        }
    }
}
