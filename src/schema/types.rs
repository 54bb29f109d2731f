//! Schema node types
//!
//! A [`SchemaNode`] is the recursive description of a stream's declared
//! shape: an object with named child nodes, an array with an item node, or
//! a literal with a scalar type union. The upstream type-simplification
//! step is expected to have already collapsed the schema into this
//! canonical form.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON Schema type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Null,
}

impl JsonType {
    /// Whether this type is a container marker rather than a literal type
    pub fn is_container(self) -> bool {
        matches!(self, JsonType::Object | JsonType::Array)
    }
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Integer => write!(f, "integer"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// The declared type union of a schema node
///
/// Accepts either a single type (`"type": "string"`) or a list
/// (`"type": ["integer", "null"]`), matching standard JSON Schema usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(JsonType),
    Union(Vec<JsonType>),
}

impl TypeSet {
    /// Create a single-type set
    pub fn single(t: JsonType) -> Self {
        TypeSet::Single(t)
    }

    /// Create a nullable type set
    pub fn nullable(t: JsonType) -> Self {
        if t == JsonType::Null {
            TypeSet::Single(JsonType::Null)
        } else {
            TypeSet::Union(vec![t, JsonType::Null])
        }
    }

    /// View the union as a slice of types
    pub fn as_slice(&self) -> &[JsonType] {
        match self {
            TypeSet::Single(t) => std::slice::from_ref(t),
            TypeSet::Union(types) => types,
        }
    }

    /// Check whether the union contains the given type
    pub fn contains(&self, t: JsonType) -> bool {
        self.as_slice().contains(&t)
    }

    /// Check whether the union carries the `object` marker
    pub fn is_object(&self) -> bool {
        self.contains(JsonType::Object)
    }

    /// Check whether the union carries the `array` marker
    pub fn is_array(&self) -> bool {
        self.contains(JsonType::Array)
    }

    /// Check whether the union admits `null`
    pub fn is_nullable(&self) -> bool {
        self.contains(JsonType::Null)
    }

    /// Get the first literal (non-container, non-null) type, if any
    pub fn primary_literal(&self) -> Option<JsonType> {
        self.as_slice()
            .iter()
            .copied()
            .find(|t| !t.is_container() && *t != JsonType::Null)
    }

    /// A copy of the union with `object` and `array` removed
    ///
    /// An empty result is valid: it marks a node that is not independently
    /// assignable and is only present for structural bookkeeping.
    pub fn without_containers(&self) -> TypeSet {
        let kept: Vec<JsonType> = self
            .as_slice()
            .iter()
            .copied()
            .filter(|t| !t.is_container())
            .collect();
        match kept.as_slice() {
            [only] => TypeSet::Single(*only),
            _ => TypeSet::Union(kept),
        }
    }

    /// A copy of the union that admits `null`
    pub fn make_nullable(&self) -> TypeSet {
        if self.is_nullable() {
            self.clone()
        } else {
            match self {
                TypeSet::Single(t) => TypeSet::nullable(*t),
                TypeSet::Union(types) => {
                    let mut types = types.clone();
                    types.push(JsonType::Null);
                    TypeSet::Union(types)
                }
            }
        }
    }
}

/// The structural shape of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An object with named properties
    Object,
    /// An array with a single items node
    Array,
    /// A scalar literal
    Literal,
}

/// One node of a stream's declared schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Declared type union
    #[serde(rename = "type")]
    pub types: TypeSet,

    /// Format hint (e.g. "date-time"), carried through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Child nodes, for object-typed nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    /// Item node, for array-typed nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Create a literal node with a single type
    pub fn literal(t: JsonType) -> Self {
        Self {
            types: TypeSet::single(t),
            format: None,
            properties: None,
            items: None,
        }
    }

    /// Create a nullable literal node
    pub fn nullable(t: JsonType) -> Self {
        Self {
            types: TypeSet::nullable(t),
            format: None,
            properties: None,
            items: None,
        }
    }

    /// Create an object node with the given properties
    pub fn object(properties: IndexMap<String, SchemaNode>) -> Self {
        Self {
            types: TypeSet::single(JsonType::Object),
            format: None,
            properties: Some(properties),
            items: None,
        }
    }

    /// Create an array node with the given item node
    pub fn array(items: SchemaNode) -> Self {
        Self {
            types: TypeSet::single(JsonType::Array),
            format: None,
            properties: None,
            items: Some(Box::new(items)),
        }
    }

    /// The nullable-integer node used for synthetic sequence and
    /// level-index columns
    pub fn nullable_integer() -> Self {
        Self::nullable(JsonType::Integer)
    }

    /// Classify this node's structural shape
    ///
    /// A union declaring both `object` and `array` on the same node is a
    /// configuration error: the two markers are mutually exclusive
    /// decorations.
    pub fn shape(&self) -> Result<Shape> {
        match (self.types.is_object(), self.types.is_array()) {
            (true, true) => Err(Error::config(
                "schema node declares both 'object' and 'array' in its type union",
            )),
            (true, false) => Ok(Shape::Object),
            (false, true) => Ok(Shape::Array),
            (false, false) => Ok(Shape::Literal),
        }
    }

    /// Literal schema reducer: a copy of this node with the `object` and
    /// `array` markers stripped from its type union
    ///
    /// A no-op when neither marker is present. Pure; the input is untouched.
    pub fn literal_only(&self) -> SchemaNode {
        SchemaNode {
            types: self.types.without_containers(),
            ..self.clone()
        }
    }

    /// Check whether the node admits `null`
    pub fn is_nullable(&self) -> bool {
        self.types.is_nullable()
    }

    /// A copy of this node that admits `null`
    pub fn make_nullable(&self) -> SchemaNode {
        SchemaNode {
            types: self.types.make_nullable(),
            ..self.clone()
        }
    }

    /// Child properties, empty when this is not an object node
    pub fn own_properties(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.properties.iter().flat_map(IndexMap::iter)
    }
}
