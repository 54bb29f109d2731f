//! Record denester
//!
//! Walks records in lock-step with the conceptual schema shape (the
//! values themselves determine shape) and buckets flattened rows by table
//! path. Every row produced from an array carries the root record's
//! inherited keys, the sequence number when present, and one level-index
//! column per ancestor array depth, so multi-level array order is fully
//! reconstructable downstream.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use indexmap::IndexMap;

use super::types::{
    level_column, source_key_column, FlattenedRow, PropertyPath, RowValue, TablePath,
    SEQUENCE_COLUMN, VALUE_COLUMN,
};

/// Propagation context: resolved synthetic column values carried from a
/// record into every row and sub-row generated from it
type Context = IndexMap<String, RowValue>;

/// Denest a batch of top-level records into flattened rows bucketed by
/// table path
///
/// Rows within a bucket preserve source array order. Fails fast when a
/// root record lacks a value for a declared business key or is not an
/// object.
pub fn denest_records(
    records: &[JsonValue],
    key_properties: &[String],
) -> Result<IndexMap<TablePath, Vec<FlattenedRow>>> {
    let mut denester = RecordDenester {
        out: IndexMap::new(),
    };
    denester.denest_root(records, key_properties)?;
    Ok(denester.out)
}

/// Builder owning the row accumulator for one denesting walk
struct RecordDenester {
    out: IndexMap<TablePath, Vec<FlattenedRow>>,
}

impl RecordDenester {
    fn denest_root(&mut self, records: &[JsonValue], key_properties: &[String]) -> Result<()> {
        for record in records {
            let JsonValue::Object(fields) = record else {
                return Err(Error::malformed(format!(
                    "top-level record is not an object: {record}"
                )));
            };
            let context = root_context(fields, key_properties)?;
            self.denest_record(&TablePath::root(), fields, &context, None, false)?;
        }
        Ok(())
    }

    /// Elements of one array become rows of the subtable at `table_path`
    fn denest_array(
        &mut self,
        table_path: &TablePath,
        elements: &[JsonValue],
        inherited: &Context,
        depth: usize,
    ) -> Result<()> {
        for (index, element) in elements.iter().enumerate() {
            let mut context = inherited.clone();
            context.insert(level_column(depth), RowValue::index(index));

            let wrapped;
            let fields = match element {
                JsonValue::Object(obj) => obj,
                scalar => {
                    wrapped = wrap_element(scalar);
                    &wrapped
                }
            };
            self.denest_record(table_path, fields, &context, Some(depth), true)?;
        }
        Ok(())
    }

    /// Flatten one record into a single row, recursing into nested arrays
    fn denest_record(
        &mut self,
        table_path: &TablePath,
        fields: &JsonObject,
        context: &Context,
        level: Option<usize>,
        emit_context: bool,
    ) -> Result<()> {
        let mut row = FlattenedRow::new();
        if emit_context {
            for (column, value) in context {
                row.insert(PropertyPath::single(column.clone()), value.clone());
            }
        }

        self.denest_fields(table_path, &PropertyPath::empty(), fields, context, level, &mut row)?;

        if emit_context {
            // Synthetic context columns win over colliding record fields.
            for (column, value) in context {
                row.insert(PropertyPath::single(column.clone()), value.clone());
            }
        }

        self.out.entry(table_path.clone()).or_default().push(row);
        Ok(())
    }

    fn denest_fields(
        &mut self,
        table_path: &TablePath,
        prefix: &PropertyPath,
        fields: &JsonObject,
        context: &Context,
        level: Option<usize>,
        row: &mut FlattenedRow,
    ) -> Result<()> {
        for (name, value) in fields {
            let prop_path = prefix.child(name);
            match value {
                // Nested objects flatten into the same row; no new row is
                // ever created for an object.
                JsonValue::Object(nested) => {
                    self.denest_fields(table_path, &prop_path, nested, context, level, row)?;
                }
                JsonValue::Array(elements) => {
                    let subtable = table_path.join(&prop_path);
                    let depth = level.map_or(0, |l| l + 1);
                    self.denest_array(&subtable, elements, context, depth)?;
                }
                // Null and missing values produce no column entry at all.
                JsonValue::Null => {}
                literal => {
                    row.insert(prop_path, RowValue::from_literal(literal)?);
                }
            }
        }
        Ok(())
    }
}

/// Seed the propagation context from a root record's own values at the
/// declared business-key field names, plus the sequence field when present
fn root_context(fields: &JsonObject, key_properties: &[String]) -> Result<Context> {
    let mut context = Context::new();
    for key in key_properties {
        let value = fields
            .get(key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| Error::missing_key_value(key))?;
        let cell = RowValue::from_literal(value).map_err(|_| {
            Error::malformed(format!("key property '{key}' is not a literal value"))
        })?;
        context.insert(source_key_column(key), cell);
    }
    if let Some(sequence) = fields.get(SEQUENCE_COLUMN) {
        if !sequence.is_null() {
            context.insert(SEQUENCE_COLUMN.to_string(), RowValue::from_literal(sequence)?);
        }
    }
    Ok(context)
}

/// Wrap a non-object array element so it denests like a record
fn wrap_element(value: &JsonValue) -> JsonObject {
    let mut wrapped = JsonObject::new();
    wrapped.insert(VALUE_COLUMN.to_string(), value.clone());
    wrapped
}
