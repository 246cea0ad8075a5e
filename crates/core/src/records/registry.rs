//! Decoding stored documents by their `entityType` discriminant.
//!
//! Every kind has one decoder in [`DECODERS`]; a document is decoded by the
//! entry whose kind matches its discriminant.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::storage::{RepositoryError, Result};

use super::kind::{RecordKind, StoredRecord};

/// A stored row as a JSON object.
pub type Document = Map<String, Value>;

/// Attribute holding the record kind.
pub const ENTITY_TYPE_ATTR: &str = "entityType";

type Decoder = fn(Value) -> serde_json::Result<StoredRecord>;

const DECODERS: &[(RecordKind, Decoder)] = &[
    (RecordKind::ScheduledActivity, decode_activity),
    (RecordKind::ReportData, decode_report),
    (RecordKind::Upload, decode_upload),
    (RecordKind::OAuthAccessGrant, decode_grant),
];

fn decode_activity(value: Value) -> serde_json::Result<StoredRecord> {
    serde_json::from_value(value).map(StoredRecord::ScheduledActivity)
}

fn decode_report(value: Value) -> serde_json::Result<StoredRecord> {
    serde_json::from_value(value).map(StoredRecord::ReportData)
}

fn decode_upload(value: Value) -> serde_json::Result<StoredRecord> {
    serde_json::from_value(value).map(StoredRecord::Upload)
}

fn decode_grant(value: Value) -> serde_json::Result<StoredRecord> {
    serde_json::from_value(value).map(StoredRecord::OAuthAccessGrant)
}

/// Converts a record into a document tagged with its kind.
pub fn encode_document(record: &StoredRecord) -> Result<Document> {
    let value = match record {
        StoredRecord::ScheduledActivity(activity) => to_value(activity)?,
        StoredRecord::ReportData(report) => to_value(report)?,
        StoredRecord::Upload(upload) => to_value(upload)?,
        StoredRecord::OAuthAccessGrant(grant) => to_value(grant)?,
    };

    let Value::Object(mut doc) = value else {
        return Err(RepositoryError::Serialization(format!(
            "{} did not serialize to an object",
            record.kind()
        )));
    };
    doc.insert(
        ENTITY_TYPE_ATTR.to_string(),
        Value::String(record.kind().as_str().to_string()),
    );
    Ok(doc)
}

/// Decodes a document using the decoder registered for its kind.
pub fn decode_document(mut doc: Document) -> Result<StoredRecord> {
    let tag = match doc.remove(ENTITY_TYPE_ATTR) {
        Some(Value::String(tag)) => tag,
        _ => {
            return Err(RepositoryError::InvalidData(format!(
                "missing {ENTITY_TYPE_ATTR} attribute"
            )))
        }
    };

    let kind = RecordKind::parse(&tag)
        .ok_or_else(|| RepositoryError::InvalidData(format!("unknown entity type: {tag}")))?;
    let decoder = DECODERS
        .iter()
        .find(|(registered, _)| *registered == kind)
        .map(|(_, decoder)| *decoder)
        .ok_or_else(|| RepositoryError::InvalidData(format!("no decoder for {kind}")))?;

    decoder(Value::Object(doc)).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn to_value<T: Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| RepositoryError::Serialization(e.to_string()))
}
