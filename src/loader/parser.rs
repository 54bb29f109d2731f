//! YAML parser for stream definitions
//!
//! Parses and validates stream definition files.

use crate::error::{Error, Result};
use crate::loader::types::StreamDefinition;
use crate::schema::Shape;
use crate::types::OptionStringExt;
use std::fs;
use std::path::Path;

/// Load a stream definition from a YAML file
pub fn load_stream(path: impl AsRef<Path>) -> Result<StreamDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read stream definition '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_stream_from_str(&content)
}

/// Load a stream definition from a YAML string
pub fn load_stream_from_str(yaml: &str) -> Result<StreamDefinition> {
    let mut def: StreamDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse stream definition YAML: {e}")))?;
    def.description = def.description.none_if_empty();

    validate_stream(&def)?;
    Ok(def)
}

/// Validate a stream definition
fn validate_stream(def: &StreamDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Stream name cannot be empty"));
    }

    if def.schema.shape()? != Shape::Object {
        return Err(Error::config(format!(
            "Stream '{}' schema must be object-typed at the top level",
            def.name
        )));
    }

    // Every declared business key must be a literal-shaped property of the
    // top-level schema. The denester would reject these later; failing at
    // load time names the stream as well.
    for key in &def.key_properties {
        let Some(node) = def
            .schema
            .properties
            .as_ref()
            .and_then(|props| props.get(key))
        else {
            return Err(Error::config(format!(
                "Stream '{}' declares key property '{}' that is not in its schema",
                def.name, key
            )));
        };
        if node.shape()? != Shape::Literal {
            return Err(Error::config(format!(
                "Stream '{}' key property '{}' must be literal-typed",
                def.name, key
            )));
        }
    }

    Ok(())
}
