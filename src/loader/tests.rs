//! Tests for the stream definition loader

use super::*;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_stream() {
    let yaml = r"
name: users
key_properties: [id]
schema:
  type: object
  properties:
    id:
      type: integer
    email:
      type: [string, 'null']
";

    let def = load_stream_from_str(yaml).unwrap();
    assert_eq!(def.name, "users");
    assert_eq!(def.key_properties, vec!["id"]);
    assert!(def.schema.types.is_object());
    assert!(def.description.is_none());
}

#[test]
fn test_load_stream_with_nested_schema() {
    let yaml = r"
name: orders
description: Orders with line items
key_properties: [order_id]
schema:
  type: object
  properties:
    order_id:
      type: string
    lines:
      type: array
      items:
        type: object
        properties:
          sku:
            type: string
";

    let def = load_stream_from_str(yaml).unwrap();
    assert_eq!(def.description.as_deref(), Some("Orders with line items"));
    let lines = def
        .schema
        .properties
        .as_ref()
        .unwrap()
        .get("lines")
        .unwrap();
    assert!(lines.types.is_array());
}

#[test]
fn test_load_stream_no_keys() {
    let yaml = r"
name: events
schema:
  type: object
  properties:
    kind:
      type: string
";

    let def = load_stream_from_str(yaml).unwrap();
    assert!(def.key_properties.is_empty());
}

#[test]
fn test_empty_description_normalized_to_none() {
    let yaml = r"
name: users
description: ''
schema:
  type: object
  properties: {}
";

    let def = load_stream_from_str(yaml).unwrap();
    assert!(def.description.is_none());
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_empty_name_rejected() {
    let yaml = r"
name: ''
schema:
  type: object
  properties: {}
";

    let err = load_stream_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("name cannot be empty"));
}

#[test]
fn test_non_object_schema_rejected() {
    let yaml = r"
name: users
schema:
  type: string
";

    let err = load_stream_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("object-typed"));
}

#[test]
fn test_unknown_key_property_rejected() {
    let yaml = r"
name: users
key_properties: [missing]
schema:
  type: object
  properties:
    id:
      type: integer
";

    let err = load_stream_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("'missing'"));
}

#[test]
fn test_non_literal_key_property_rejected() {
    let yaml = r"
name: users
key_properties: [meta]
schema:
  type: object
  properties:
    meta:
      type: object
      properties:
        id:
          type: integer
";

    let err = load_stream_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("literal-typed"));
}

#[test]
fn test_invalid_yaml_rejected() {
    let err = load_stream_from_str("name: [unterminated").unwrap_err();
    assert!(err.to_string().contains("Failed to parse"));
}

#[test]
fn test_load_stream_missing_file() {
    let err = load_stream("/definitely/not/here.yaml").unwrap_err();
    assert!(matches!(err, crate::error::Error::FileNotFound { .. }));
}
