//! Loader types
//!
//! Declarative stream definition types for YAML parsing.

use crate::schema::SchemaNode;
use serde::{Deserialize, Serialize};

/// One logical stream: its name, business keys, and declared schema
///
/// The upstream source guarantees schema and business keys stay stable
/// for the lifetime of one series of denesting calls over the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StreamDefinition {
    /// Stream name, used to name output tables/files
    pub name: String,

    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Business-key property names identifying one root record
    #[serde(default)]
    pub key_properties: Vec<String>,

    /// The stream's declared schema, object-typed at the top level
    pub schema: SchemaNode,
}
