//! Integration tests for the full flattening pipeline
//!
//! Tests the end-to-end flow: YAML stream definition → table batches → Parquet output

use denest::denest::{
    to_table_batches, SEQUENCE_COLUMN, SOURCE_KEY_PREFIX, VALUE_COLUMN,
};
use denest::loader::load_stream_from_str;
use denest::output::{write_table_batches, ParquetWriterConfig};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::json;

const ORDERS_STREAM: &str = r#"
name: orders
description: Customer orders with nested line items
key_properties:
  - order_id
schema:
  type: object
  properties:
    order_id:
      type: integer
    customer:
      type: object
      properties:
        name:
          type: string
        email:
          type: [string, "null"]
    line_items:
      type: array
      items:
        type: object
        properties:
          sku:
            type: string
          quantity:
            type: integer
    tags:
      type: array
      items:
        type: string
"#;

fn order_records() -> Vec<serde_json::Value> {
    vec![
        json!({
            "order_id": 1001,
            "customer": {"name": "Alice", "email": "alice@example.com"},
            "line_items": [
                {"sku": "A-1", "quantity": 2},
                {"sku": "B-7", "quantity": 1}
            ],
            "tags": ["priority"]
        }),
        json!({
            "order_id": 1002,
            "customer": {"name": "Bob", "email": null},
            "line_items": [],
            "tags": ["gift", "fragile"]
        }),
    ]
}

// ============================================================================
// YAML → Table Batch Tests
// ============================================================================

#[test]
fn test_stream_to_table_batches() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    assert_eq!(stream.name, "orders");
    assert_eq!(stream.key_properties, vec!["order_id".to_string()]);

    let batches =
        to_table_batches(&stream.schema, &stream.key_properties, &order_records()).unwrap();

    // Root table first, then subtables in schema order
    assert_eq!(batches.len(), 3);
    assert!(batches[0].schema.is_root());
    assert_eq!(batches[0].schema.path.to_string(), "(root)");
    assert_eq!(batches[1].schema.path.to_string(), "line_items");
    assert_eq!(batches[2].schema.path.to_string(), "tags");

    assert_eq!(batches[0].rows.len(), 2);
    assert_eq!(batches[1].rows.len(), 2);
    assert_eq!(batches[2].rows.len(), 3);
}

#[test]
fn test_nested_object_flattened_into_root() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let batches =
        to_table_batches(&stream.schema, &stream.key_properties, &order_records()).unwrap();

    let root = &batches[0];
    let columns: Vec<String> = root
        .schema
        .properties
        .keys()
        .map(|p| p.column_name())
        .collect();
    assert!(columns.contains(&"customer__name".to_string()));
    assert!(columns.contains(&"customer__email".to_string()));
    // The array properties moved into their own tables
    assert!(!columns.iter().any(|c| c.starts_with("line_items")));
    assert!(!columns.iter().any(|c| c.starts_with("tags")));
}

#[test]
fn test_subtable_rows_carry_parent_keys() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let batches =
        to_table_batches(&stream.schema, &stream.key_properties, &order_records()).unwrap();

    let key_column = format!("{SOURCE_KEY_PREFIX}order_id");
    let tags = &batches[2];
    let parents: Vec<i64> = tags
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .find(|(path, _)| path.column_name() == key_column)
                .and_then(|(_, cell)| cell.value.as_i64())
                .unwrap()
        })
        .collect();
    assert_eq!(parents, vec![1001, 1002, 1002]);

    // String array elements land in the scalar wrapper column
    let values: Vec<&str> = tags
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .find(|(path, _)| path.column_name() == VALUE_COLUMN)
                .and_then(|(_, cell)| cell.value.as_str())
                .unwrap()
        })
        .collect();
    assert_eq!(values, vec!["priority", "gift", "fragile"]);
}

#[test]
fn test_sequence_propagates_to_subtables() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let records = vec![json!({
        "order_id": 1,
        "_sdc_sequence": 99,
        "tags": ["x"]
    })];
    let batches = to_table_batches(&stream.schema, &stream.key_properties, &records).unwrap();

    for batch in &batches {
        for row in &batch.rows {
            let sequence = row
                .iter()
                .find(|(path, _)| path.column_name() == SEQUENCE_COLUMN)
                .and_then(|(_, cell)| cell.value.as_i64());
            assert_eq!(sequence, Some(99));
        }
    }
}

#[test]
fn test_missing_key_value_is_an_error() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let records = vec![json!({"customer": {"name": "Eve"}})];
    let err =
        to_table_batches(&stream.schema, &stream.key_properties, &records).unwrap_err();
    assert!(err
        .to_string()
        .contains("missing a value for key property 'order_id'"));
}

// ============================================================================
// Parquet Output Tests
// ============================================================================

#[test]
fn test_write_parquet_files_per_table() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let batches =
        to_table_batches(&stream.schema, &stream.key_properties, &order_records()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths =
        write_table_batches(dir.path(), &stream.name, &batches, &ParquetWriterConfig::default())
            .unwrap();

    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "orders.parquet".to_string(),
            "orders__line_items.parquet".to_string(),
            "orders__tags.parquet".to_string(),
        ]
    );

    for path in &paths {
        assert!(path.exists());
    }
}

#[test]
fn test_parquet_round_trip_preserves_rows() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let batches =
        to_table_batches(&stream.schema, &stream.key_properties, &order_records()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths =
        write_table_batches(dir.path(), &stream.name, &batches, &ParquetWriterConfig::default())
            .unwrap();

    // Root file: two orders with flattened customer columns
    let file = std::fs::File::open(&paths[0]).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let read: Vec<_> = reader.map(Result::unwrap).collect();
    let total_rows: usize = read.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total_rows, 2);

    let schema = read[0].schema();
    assert!(schema.column_with_name("order_id").is_some());
    assert!(schema.column_with_name("customer__name").is_some());
    assert!(schema.column_with_name("customer__email").is_some());
}

#[test]
fn test_empty_batches_still_produce_files() {
    let stream = load_stream_from_str(ORDERS_STREAM).unwrap();
    let records = vec![json!({"order_id": 5})];
    let batches = to_table_batches(&stream.schema, &stream.key_properties, &records).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths =
        write_table_batches(dir.path(), &stream.name, &batches, &ParquetWriterConfig::default())
            .unwrap();

    // Declared subtables get a (possibly empty) file each
    assert_eq!(paths.len(), 3);

    let file = std::fs::File::open(&paths[2]).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let total_rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(total_rows, 0);
}
