//! DynamoDB attribute conversion functions.
//!
//! Items are converted to tagged documents and decoded through the record
//! registry, which selects the decoder by the `entityType` attribute.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Number, Value};
use studystore_core::paging::IndexEntry;
use studystore_core::records::{
    decode_document, encode_document, Document, StoredRecord, TableSchema,
};
use studystore_core::storage::RepositoryError;

pub type Item = HashMap<String, AttributeValue>;

/// Convert a JSON value to a DynamoDB attribute.
pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(value_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert a DynamoDB attribute to a JSON value.
pub fn attribute_to_value(attr: &AttributeValue) -> Result<Value, RepositoryError> {
    match attr {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => n
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| RepositoryError::InvalidData(format!("Invalid number: {}", n))),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(items) => items
            .iter()
            .map(attribute_to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_to_document(map).map(Value::Object),
        AttributeValue::Ss(set) => Ok(Value::Array(
            set.iter().map(|s| Value::String(s.clone())).collect(),
        )),
        other => Err(RepositoryError::InvalidData(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

fn item_to_document(item: &Item) -> Result<Document, RepositoryError> {
    item.iter()
        .map(|(k, v)| attribute_to_value(v).map(|value| (k.clone(), value)))
        .collect()
}

/// Convert a record to a DynamoDB item. Null attributes are left out.
pub fn record_to_item(record: &StoredRecord) -> Result<Item, RepositoryError> {
    let doc = encode_document(record)?;
    Ok(doc
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), value_to_attribute(v)))
        .collect())
}

/// Convert a DynamoDB item to a record of the kind named by its discriminant.
pub fn item_to_record(item: &Item) -> Result<StoredRecord, RepositoryError> {
    decode_document(item_to_document(item)?)
}

/// Convert a keys-only index item to an index entry.
pub fn item_to_index_entry(
    schema: &TableSchema,
    item: &Item,
) -> Result<IndexEntry, RepositoryError> {
    let doc = item_to_document(item)?;
    schema
        .index_entry(&doc)?
        .ok_or_else(|| RepositoryError::InvalidData("Index item without index attributes".into()))
}
