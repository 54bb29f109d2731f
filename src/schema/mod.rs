//! Schema node model
//!
//! The recursive [`SchemaNode`] structure describing a stream's declared
//! shape, plus the literal schema reducer used when a property is known to
//! hold only literal values.
//!
//! # Features
//!
//! - **Single-or-list type unions**: `"type": "string"` and
//!   `"type": ["integer", "null"]` both parse
//! - **Shape classification**: one dispatch point over object/array/literal
//! - **Literal reduction**: strip container markers without touching the
//!   input node

mod types;

pub use types::{JsonType, SchemaNode, Shape, TypeSet};
