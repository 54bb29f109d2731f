//! Denesting types
//!
//! Table paths, tuple-path column keys, flattened rows, and the table
//! batch pairing handed to the destination writer.

use crate::error::{Error, Result};
use crate::schema::{JsonType, SchemaNode};
use crate::types::JsonValue;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

// ============================================================================
// Synthetic column naming
// ============================================================================
// These literal names are a compatibility contract with the downstream
// writer/DDL generator and must match it byte for byte.

/// Prefix marking a column copied from the root record's business keys
pub const SOURCE_KEY_PREFIX: &str = "_sdc_source_key_";

/// Reserved name of the per-record sequence column
pub const SEQUENCE_COLUMN: &str = "_sdc_sequence";

/// Prefix of the per-depth level-index columns
pub const LEVEL_PREFIX: &str = "_sdc_level_";

/// Reserved name of the scalar-wrapper column for non-object array items
pub const VALUE_COLUMN: &str = "_sdc_value";

/// Inherited-key column name for a business key
pub fn source_key_column(key: &str) -> String {
    format!("{SOURCE_KEY_PREFIX}{key}")
}

/// Level-index column name for an array nesting depth
pub fn level_column(depth: usize) -> String {
    format!("{LEVEL_PREFIX}{depth}")
}

// ============================================================================
// Paths
// ============================================================================

/// Ordered property-name sequence identifying a table's position in the
/// original nesting; empty for the root table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TablePath(Vec<String>);

impl TablePath {
    /// The root table's path
    pub fn root() -> Self {
        Self::default()
    }

    /// Check whether this is the root table's path
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Extend this table path with a property path
    pub fn join(&self, path: &PropertyPath) -> TablePath {
        let mut segments = self.0.clone();
        segments.extend(path.segments().iter().cloned());
        TablePath(segments)
    }

    /// Storage-facing table name fragment, segments joined with `__`
    pub fn table_name(&self) -> String {
        self.0.join("__")
    }
}

impl std::fmt::Display for TablePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.0.join("."))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for TablePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TablePath(iter.into_iter().map(Into::into).collect())
    }
}

/// Tuple path keying one flattened column
///
/// Flattening merges multiple levels of nested object properties into one
/// column, so columns are keyed by the ordered sequence of property names
/// traversed, not a single name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    /// The empty path
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single-segment path
    pub fn single(name: impl Into<String>) -> Self {
        PropertyPath(vec![name.into()])
    }

    /// This path extended by one more segment
    pub fn child(&self, name: &str) -> PropertyPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        PropertyPath(segments)
    }

    /// The path segments
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Finalized storage-facing column name, segments joined with `__`
    pub fn column_name(&self) -> String {
        self.0.join("__")
    }
}

impl std::fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl<S: Into<String>> FromIterator<S> for PropertyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PropertyPath(iter.into_iter().map(Into::into).collect())
    }
}

impl Serialize for PropertyPath {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(&self.0.join("."))
    }
}

// ============================================================================
// Rows and batches
// ============================================================================

/// A literal cell value paired with the runtime type it was read as
#[derive(Debug, Clone, PartialEq)]
pub struct RowValue {
    /// Type the value was classified as at the point it was read
    pub value_type: JsonType,
    /// The value itself
    pub value: JsonValue,
}

impl RowValue {
    /// Classify a literal JSON value
    ///
    /// Objects, arrays, and nulls are not literals and are rejected; the
    /// denester handles those shapes before reaching this point.
    pub fn from_literal(value: &JsonValue) -> Result<Self> {
        let value_type = match value {
            JsonValue::Bool(_) => JsonType::Boolean,
            JsonValue::Number(n) if n.is_i64() => JsonType::Integer,
            // Destination integer columns are signed 64-bit; a larger
            // unsigned value cannot be stored without corrupting it.
            JsonValue::Number(n) if n.is_u64() => {
                return Err(Error::malformed(format!(
                    "integer value {n} exceeds the signed 64-bit range"
                )))
            }
            JsonValue::Number(_) => JsonType::Number,
            JsonValue::String(_) => JsonType::String,
            other => {
                return Err(Error::malformed(format!(
                    "value is not a literal: {other}"
                )))
            }
        };
        Ok(Self {
            value_type,
            value: value.clone(),
        })
    }

    /// An integer cell, used for synthetic level indices
    pub fn index(index: usize) -> Self {
        Self {
            value_type: JsonType::Integer,
            value: JsonValue::from(index),
        }
    }
}

impl Serialize for RowValue {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error> {
        self.value.serialize(serializer)
    }
}

/// One flattened row: tuple path to literal cell, in production order
pub type FlattenedRow = IndexMap<PropertyPath, RowValue>;

/// One flat destination table's schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    /// Position of this table in the original nesting; empty for the root
    pub path: TablePath,

    /// Array-nesting depth; `None` for the root table, else starting at 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<usize>,

    /// Column names that uniquely identify a row: the caller's business
    /// keys for the root table, synthesized inherited keys for subtables
    pub key_properties: Vec<String>,

    /// Flattened column schemas, keyed by tuple path, in discovery order
    pub properties: IndexMap<PropertyPath, SchemaNode>,
}

impl TableSchema {
    /// Check whether this is the root table
    pub fn is_root(&self) -> bool {
        self.path.is_root()
    }

    /// Verify that every declared key property exists among the flattened
    /// properties
    pub fn validate_keys(&self) -> Result<()> {
        for key in &self.key_properties {
            if !self.properties.contains_key(&PropertyPath::single(key.clone())) {
                return Err(Error::missing_key_property(key, self.path.to_string()));
            }
        }
        Ok(())
    }
}

/// Pairing of one table schema with its flattened rows for one call
///
/// Constructed fresh per [`to_table_batches`](super::to_table_batches)
/// invocation; ownership passes immediately to the destination writer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableBatch {
    /// The table's flattened schema
    pub schema: TableSchema,
    /// The table's rows, in source order
    pub rows: Vec<FlattenedRow>,
}
