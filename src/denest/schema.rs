//! Schema denester
//!
//! Recursively walks a nested stream schema and produces one flat table
//! schema per array found at any depth, plus the root table schema.
//! Nested object properties flatten into their closest enclosing table
//! under extended tuple paths; every array starts a new subtable seeded
//! with inherited-key, sequence, and level-index columns.

use crate::error::{Error, Result};
use crate::schema::{SchemaNode, Shape};
use indexmap::IndexMap;
use tracing::debug;

use super::types::{
    level_column, source_key_column, PropertyPath, TablePath, TableSchema, SEQUENCE_COLUMN,
    VALUE_COLUMN,
};

/// Denest a stream schema into its flat table schemas, root table first,
/// subtables following in discovery order (depth-first, left-to-right,
/// parent before child)
///
/// Fails with a configuration error when a declared business key is not
/// present among the root table's flattened properties.
pub fn denest_schema(schema: &SchemaNode, key_properties: &[String]) -> Result<Vec<TableSchema>> {
    if schema.shape()? != Shape::Object {
        return Err(Error::config(
            "stream schema must be object-typed at the top level",
        ));
    }

    let mut key_prop_schemas = IndexMap::new();
    for key in key_properties {
        let node = schema
            .properties
            .as_ref()
            .and_then(|props| props.get(key))
            .ok_or_else(|| Error::missing_key_property(key, TablePath::root().to_string()))?;
        key_prop_schemas.insert(key.clone(), node.literal_only());
    }

    let mut denester = SchemaDenester {
        key_prop_schemas,
        subtables: IndexMap::new(),
    };
    let root_properties = denester.denest_object(&TablePath::root(), schema, None)?;

    let root = TableSchema {
        path: TablePath::root(),
        level: None,
        key_properties: key_properties.to_vec(),
        properties: root_properties,
    };
    root.validate_keys()?;

    let mut tables = Vec::with_capacity(1 + denester.subtables.len());
    tables.push(root);
    tables.extend(denester.subtables.into_values());
    Ok(tables)
}

/// Builder owning the subtable accumulator for one denesting walk
struct SchemaDenester {
    /// Literal-reduced schema per business key, in declared key order
    key_prop_schemas: IndexMap<String, SchemaNode>,
    /// Subtable schemas keyed by table path, in discovery order
    subtables: IndexMap<TablePath, TableSchema>,
}

impl SchemaDenester {
    /// Flatten one object node into a single table's property set,
    /// registering subtables for arrays found along the way
    fn denest_object(
        &mut self,
        table_path: &TablePath,
        node: &SchemaNode,
        level: Option<usize>,
    ) -> Result<IndexMap<PropertyPath, SchemaNode>> {
        let mut properties = IndexMap::new();
        self.denest_into(
            table_path,
            &PropertyPath::empty(),
            node,
            node.is_nullable(),
            level,
            &mut properties,
        )?;
        Ok(properties)
    }

    fn denest_into(
        &mut self,
        table_path: &TablePath,
        prefix: &PropertyPath,
        node: &SchemaNode,
        nullable: bool,
        level: Option<usize>,
        out: &mut IndexMap<PropertyPath, SchemaNode>,
    ) -> Result<()> {
        for (name, child) in node.own_properties() {
            let prop_path = prefix.child(name);
            let shape = child.shape().map_err(|_| {
                Error::config(format!(
                    "property '{prop_path}' of table '{table_path}' declares both 'object' and 'array' in its type union"
                ))
            })?;
            match shape {
                Shape::Object => {
                    // Nested objects flatten into the current table under
                    // the extended tuple path.
                    self.denest_into(
                        table_path,
                        &prop_path,
                        child,
                        nullable || child.is_nullable(),
                        level,
                        out,
                    )?;
                }
                Shape::Array => {
                    let items = child.items.as_deref().ok_or_else(|| {
                        Error::config(format!(
                            "array property '{prop_path}' of table '{table_path}' has no items schema"
                        ))
                    })?;
                    let subtable_path = table_path.join(&prop_path);
                    let next_level = level.map_or(0, |l| l + 1);
                    self.create_subtable(subtable_path, items, next_level)?;
                }
                Shape::Literal => {
                    // A literal reached through a nullable enclosing object
                    // may be absent at runtime even if not itself nullable.
                    let literal = if nullable {
                        child.literal_only().make_nullable()
                    } else {
                        child.literal_only()
                    };
                    out.insert(prop_path, literal);
                }
            }
        }
        Ok(())
    }

    /// Start a new subtable for an array's items schema
    fn create_subtable(
        &mut self,
        path: TablePath,
        items: &SchemaNode,
        level: usize,
    ) -> Result<()> {
        debug!(table = %path, level, "discovered subtable");

        // Register before recursing so parents precede children in the
        // final batch order.
        self.subtables.insert(
            path.clone(),
            TableSchema {
                path: path.clone(),
                level: Some(level),
                key_properties: self
                    .key_prop_schemas
                    .keys()
                    .map(|key| source_key_column(key))
                    .collect(),
                properties: IndexMap::new(),
            },
        );

        let mut properties = IndexMap::new();
        for (key, key_schema) in &self.key_prop_schemas {
            properties.insert(
                PropertyPath::single(source_key_column(key)),
                key_schema.clone(),
            );
        }
        properties.insert(
            PropertyPath::single(SEQUENCE_COLUMN),
            SchemaNode::nullable_integer(),
        );
        for depth in 0..=level {
            properties.insert(
                PropertyPath::single(level_column(depth)),
                SchemaNode::nullable_integer(),
            );
        }

        let items_shape = items.shape().map_err(|_| {
            Error::config(format!(
                "items of table '{path}' declare both 'object' and 'array' in their type union"
            ))
        })?;
        // Non-object items live in a single synthetic value column; the
        // wrapper also routes arrays-of-arrays through the regular walk.
        let item_node = match items_shape {
            Shape::Object => items.clone(),
            Shape::Array | Shape::Literal => {
                let mut wrapped = IndexMap::new();
                wrapped.insert(VALUE_COLUMN.to_string(), items.clone());
                SchemaNode::object(wrapped)
            }
        };
        self.denest_into(
            &path,
            &PropertyPath::empty(),
            &item_node,
            item_node.is_nullable(),
            Some(level),
            &mut properties,
        )?;

        if let Some(subtable) = self.subtables.get_mut(&path) {
            subtable.properties = properties;
        }
        Ok(())
    }
}
