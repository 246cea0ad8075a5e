//! DynamoDB key and expression helpers.
//!
//! Pure functions; attribute names come from the table schemas in
//! `studystore_core::records`.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use studystore_core::paging::PrimaryKey;
use studystore_core::records::TableSchema;

/// Placeholder for the partition attribute name (`key` and `date` are reserved words).
pub const PARTITION_NAME: &str = "#pk";
/// Placeholder for the sort or index value attribute name.
pub const SORT_NAME: &str = "#sk";

/// Key condition for a partition and an inclusive value range.
///
/// Pattern: `#pk = :pk AND #sk BETWEEN :lower AND :upper`
pub fn range_condition() -> String {
    format!("{PARTITION_NAME} = :pk AND {SORT_NAME} BETWEEN :lower AND :upper")
}

/// Attribute map addressing one record of a table.
pub fn key_to_item(schema: &TableSchema, key: &PrimaryKey) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(
        schema.partition_attr.to_string(),
        AttributeValue::S(key.partition.clone()),
    );
    if let (Some(attr), Some(sort)) = (schema.sort_attr, &key.sort) {
        item.insert(attr.to_string(), AttributeValue::S(sort.clone()));
    }
    item
}

/// String value of a key attribute.
pub fn key_string(item: &HashMap<String, AttributeValue>, attr: &str) -> Option<String> {
    item.get(attr)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}
