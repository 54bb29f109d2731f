//! Denesting engine
//!
//! Converts a nested stream schema and its matching records into flat,
//! relationally shaped table batches: one root table holding every
//! non-array property of the top-level record, plus one subtable per array
//! property found at any nesting depth. Subtable rows carry synthetic
//! inherited-key, sequence, and level-index columns so they can be
//! re-associated with their parent and with each other, deterministically
//! and without data loss.
//!
//! The engine is purely synchronous; each [`to_table_batches`] call is one
//! complete, independent unit of work with no shared state.
//!
//! # Example
//!
//! ```
//! use denest::denest::to_table_batches;
//! use serde_json::json;
//!
//! let schema = serde_json::from_value(json!({
//!     "type": "object",
//!     "properties": {
//!         "id": {"type": "string"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     }
//! }))?;
//! let records = vec![json!({"id": "x", "tags": ["p", "q"]})];
//!
//! let batches = to_table_batches(&schema, &["id".to_string()], &records)?;
//! assert_eq!(batches.len(), 2);
//! assert_eq!(batches[0].rows.len(), 1); // root table
//! assert_eq!(batches[1].rows.len(), 2); // tags subtable
//! # Ok::<(), denest::Error>(())
//! ```

mod records;
mod schema;
mod types;

pub use records::denest_records;
pub use schema::denest_schema;
pub use types::{
    level_column, source_key_column, FlattenedRow, PropertyPath, RowValue, TableBatch, TablePath,
    TableSchema, LEVEL_PREFIX, SEQUENCE_COLUMN, SOURCE_KEY_PREFIX, VALUE_COLUMN,
};

use crate::error::Result;
use crate::schema::SchemaNode;
use crate::types::JsonValue;
use tracing::{info, warn};

/// Denest one schema plus one batch of records into an ordered list of
/// table batches, root table first
///
/// Every table discovered in the schema yields a batch, even when no
/// record populated it in this call. Rows bucketed under a table path the
/// schema does not declare are dropped with a warning; the schema defines
/// the universe of tables.
pub fn to_table_batches(
    schema: &SchemaNode,
    key_properties: &[String],
    records: &[JsonValue],
) -> Result<Vec<TableBatch>> {
    let table_schemas = denest_schema(schema, key_properties)?;
    let mut table_rows = denest_records(records, key_properties)?;

    let batches: Vec<TableBatch> = table_schemas
        .into_iter()
        .map(|table| {
            let rows = table_rows.shift_remove(&table.path).unwrap_or_default();
            TableBatch {
                schema: table,
                rows,
            }
        })
        .collect();

    for (path, rows) in &table_rows {
        warn!(table = %path, rows = rows.len(), "records produced rows for an undeclared table; dropping");
    }
    info!(
        tables = batches.len(),
        rows = batches.iter().map(|b| b.rows.len()).sum::<usize>(),
        "assembled table batches"
    );
    Ok(batches)
}
