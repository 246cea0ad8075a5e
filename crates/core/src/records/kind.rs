//! Closed set of record kinds and their table layouts.

use std::fmt;

use serde_json::Value;

use crate::paging::{IndexEntry, PrimaryKey};
use crate::storage::{RepositoryError, Result};

use super::keys::{ACTIVITY_SCHEMA, GRANT_SCHEMA, REPORT_SCHEMA, UPLOAD_SCHEMA};
use super::registry::Document;
use super::types::{OAuthAccessGrant, ReportData, ScheduledActivity, Upload};

/// Discriminant stored with every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    ScheduledActivity,
    ReportData,
    Upload,
    OAuthAccessGrant,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::ScheduledActivity,
        RecordKind::ReportData,
        RecordKind::Upload,
        RecordKind::OAuthAccessGrant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::ScheduledActivity => "ScheduledActivity",
            RecordKind::ReportData => "ReportData",
            RecordKind::Upload => "Upload",
            RecordKind::OAuthAccessGrant => "OAuthAccessGrant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s)
    }

    /// Table layout for records of this kind.
    pub fn schema(&self) -> &'static TableSchema {
        match self {
            RecordKind::ScheduledActivity => &ACTIVITY_SCHEMA,
            RecordKind::ReportData => &REPORT_SCHEMA,
            RecordKind::Upload => &UPLOAD_SCHEMA,
            RecordKind::OAuthAccessGrant => &GRANT_SCHEMA,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record of any kind, as read back from a table.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    ScheduledActivity(ScheduledActivity),
    ReportData(ReportData),
    Upload(Upload),
    OAuthAccessGrant(OAuthAccessGrant),
}

impl StoredRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            StoredRecord::ScheduledActivity(_) => RecordKind::ScheduledActivity,
            StoredRecord::ReportData(_) => RecordKind::ReportData,
            StoredRecord::Upload(_) => RecordKind::Upload,
            StoredRecord::OAuthAccessGrant(_) => RecordKind::OAuthAccessGrant,
        }
    }
}

impl From<ScheduledActivity> for StoredRecord {
    fn from(record: ScheduledActivity) -> Self {
        StoredRecord::ScheduledActivity(record)
    }
}

impl From<ReportData> for StoredRecord {
    fn from(record: ReportData) -> Self {
        StoredRecord::ReportData(record)
    }
}

impl From<Upload> for StoredRecord {
    fn from(record: Upload) -> Self {
        StoredRecord::Upload(record)
    }
}

impl From<OAuthAccessGrant> for StoredRecord {
    fn from(record: OAuthAccessGrant) -> Self {
        StoredRecord::OAuthAccessGrant(record)
    }
}

/// A concrete record type that can be recovered from a [`StoredRecord`].
pub trait KindedRecord: Sized + Send {
    const KIND: RecordKind;

    /// Unwraps the record, handing it back unchanged if it is another kind.
    fn from_stored(record: StoredRecord) -> std::result::Result<Self, StoredRecord>;
}

impl KindedRecord for ScheduledActivity {
    const KIND: RecordKind = RecordKind::ScheduledActivity;

    fn from_stored(record: StoredRecord) -> std::result::Result<Self, StoredRecord> {
        match record {
            StoredRecord::ScheduledActivity(activity) => Ok(activity),
            other => Err(other),
        }
    }
}

impl KindedRecord for ReportData {
    const KIND: RecordKind = RecordKind::ReportData;

    fn from_stored(record: StoredRecord) -> std::result::Result<Self, StoredRecord> {
        match record {
            StoredRecord::ReportData(report) => Ok(report),
            other => Err(other),
        }
    }
}

impl KindedRecord for Upload {
    const KIND: RecordKind = RecordKind::Upload;

    fn from_stored(record: StoredRecord) -> std::result::Result<Self, StoredRecord> {
        match record {
            StoredRecord::Upload(upload) => Ok(upload),
            other => Err(other),
        }
    }
}

impl KindedRecord for OAuthAccessGrant {
    const KIND: RecordKind = RecordKind::OAuthAccessGrant;

    fn from_stored(record: StoredRecord) -> std::result::Result<Self, StoredRecord> {
        match record {
            StoredRecord::OAuthAccessGrant(grant) => Ok(grant),
            other => Err(other),
        }
    }
}

/// Secondary index layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: &'static str,
    pub partition_attr: &'static str,
    pub value_attr: &'static str,
    /// Attribute holding the tie-break identifier.
    pub id_attr: &'static str,
}

/// Attribute layout of one record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub kind: RecordKind,
    pub partition_attr: &'static str,
    pub sort_attr: Option<&'static str>,
    pub index: Option<IndexSchema>,
}

impl TableSchema {
    /// Reads the primary key out of a document or projection.
    pub fn primary_key(&self, doc: &Document) -> Result<PrimaryKey> {
        let partition = required_string(doc, self.partition_attr)?;
        let sort = match self.sort_attr {
            Some(attr) => Some(required_string(doc, attr)?),
            None => None,
        };
        Ok(PrimaryKey { partition, sort })
    }

    /// Reads the index projection of a document.
    ///
    /// Returns `None` when the table has no index or the document does not
    /// carry the index attributes.
    pub fn index_entry(&self, doc: &Document) -> Result<Option<IndexEntry>> {
        let Some(index) = &self.index else {
            return Ok(None);
        };
        let (Some(partition), Some(index_value)) = (
            optional_string(doc, index.partition_attr),
            optional_string(doc, index.value_attr),
        ) else {
            return Ok(None);
        };

        Ok(Some(IndexEntry {
            partition,
            index_value,
            id: required_string(doc, index.id_attr)?,
            key: self.primary_key(doc)?,
        }))
    }
}

fn optional_string(doc: &Document, attr: &str) -> Option<String> {
    doc.get(attr).and_then(Value::as_str).map(str::to_string)
}

fn required_string(doc: &Document, attr: &str) -> Result<String> {
    optional_string(doc, attr).ok_or_else(|| {
        RepositoryError::InvalidData(format!("missing or non-string attribute: {attr}"))
    })
}
