use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::paging::{PagedRecord, Position, KEY_SEPARATOR};
use crate::serde::{
    deserialize_optional_timestamp, deserialize_timestamp, serialize_optional_timestamp,
    serialize_timestamp, timestamp_key,
};

use super::keys::{activity_guid_key, grant_key, referent_index_value};

/// Type of a scheduled activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Task,
    Survey,
    Compound,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Task => "task",
            ActivityType::Survey => "survey",
            ActivityType::Compound => "compound",
        }
    }
}

/// One scheduled occurrence of an activity for a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    pub health_code: String,
    /// `<activity_guid>:<scheduled_on>`, unique within a participant.
    pub guid: String,
    /// `<referent_guid>:<activity_type>:<scheduled_on>`, the referent index value.
    pub referent_guid: String,
    pub activity_type: ActivityType,
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub scheduled_on: DateTime<Utc>,
    #[serde(
        default,
        serialize_with = "serialize_optional_timestamp",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub started_on: Option<DateTime<Utc>>,
    #[serde(
        default,
        serialize_with = "serialize_optional_timestamp",
        deserialize_with = "deserialize_optional_timestamp"
    )]
    pub finished_on: Option<DateTime<Utc>>,
}

impl ScheduledActivity {
    pub fn new(
        health_code: impl Into<String>,
        activity_guid: &str,
        referent_guid: &str,
        activity_type: ActivityType,
        scheduled_on: DateTime<Utc>,
    ) -> Self {
        Self {
            health_code: health_code.into(),
            guid: activity_guid_key(activity_guid, &scheduled_on),
            referent_guid: referent_index_value(referent_guid, activity_type, &scheduled_on),
            activity_type,
            scheduled_on,
            started_on: None,
            finished_on: None,
        }
    }

    /// The activity this occurrence belongs to.
    pub fn activity_guid(&self) -> &str {
        self.guid
            .split_once(KEY_SEPARATOR)
            .map_or(self.guid.as_str(), |(activity_guid, _)| activity_guid)
    }
}

impl PagedRecord for ScheduledActivity {
    fn position(&self) -> Position {
        Position::new(self.referent_guid.clone(), self.guid.clone())
    }
}

/// Identity of a report: a study-wide report when `health_code` is absent,
/// a participant report otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReportDataKey {
    pub health_code: Option<String>,
    pub identifier: String,
    pub study_id: String,
}

impl ReportDataKey {
    pub fn study(identifier: impl Into<String>, study_id: impl Into<String>) -> Self {
        Self {
            health_code: None,
            identifier: identifier.into(),
            study_id: study_id.into(),
        }
    }

    pub fn participant(
        health_code: impl Into<String>,
        identifier: impl Into<String>,
        study_id: impl Into<String>,
    ) -> Self {
        Self {
            health_code: Some(health_code.into()),
            identifier: identifier.into(),
            study_id: study_id.into(),
        }
    }

    /// Partition key string.
    ///
    /// Pattern: `[<health_code>:]<identifier>:<study_id>`
    pub fn key_string(&self) -> String {
        match &self.health_code {
            Some(health_code) => format!(
                "{health_code}{KEY_SEPARATOR}{}{KEY_SEPARATOR}{}",
                self.identifier, self.study_id
            ),
            None => format!("{}{KEY_SEPARATOR}{}", self.identifier, self.study_id),
        }
    }
}

impl fmt::Display for ReportDataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_string())
    }
}

impl From<ReportDataKey> for String {
    fn from(key: ReportDataKey) -> Self {
        key.key_string()
    }
}

impl TryFrom<String> for ReportDataKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = value.split(KEY_SEPARATOR).collect();
        match parts.as_slice() {
            [identifier, study_id] => Ok(Self::study(*identifier, *study_id)),
            [health_code, identifier, study_id] => {
                Ok(Self::participant(*health_code, *identifier, *study_id))
            }
            _ => Err(format!("invalid report key: {value}")),
        }
    }
}

/// One day of report data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub key: ReportDataKey,
    pub date: NaiveDate,
    pub data: serde_json::Value,
}

impl PagedRecord for ReportData {
    fn position(&self) -> Position {
        Position::new(self.date.to_string(), self.key.key_string())
    }
}

/// Processing state of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Requested,
    ValidationInProgress,
    ValidationFailed,
    Succeeded,
    Duplicate,
}

/// Metadata of a participant's data upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub upload_id: String,
    pub health_code: String,
    pub study_id: String,
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub requested_on: DateTime<Utc>,
    pub filename: String,
    pub content_length: u64,
    pub status: UploadStatus,
}

impl PagedRecord for Upload {
    fn position(&self) -> Position {
        Position::new(timestamp_key(&self.requested_on), self.upload_id.clone())
    }
}

/// A participant's grant of access to their data at an OAuth vendor.
///
/// Grants of one study and vendor share a partition and sort by health code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthAccessGrant {
    /// `<study_id>:<vendor_id>`
    pub key: String,
    pub vendor_id: String,
    pub health_code: String,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_on: DateTime<Utc>,
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub expires_on: DateTime<Utc>,
}

impl OAuthAccessGrant {
    pub fn new(
        study_id: &str,
        vendor_id: impl Into<String>,
        health_code: impl Into<String>,
        created_on: DateTime<Utc>,
        expires_on: DateTime<Utc>,
    ) -> Self {
        let vendor_id = vendor_id.into();
        Self {
            key: grant_key(study_id, &vendor_id),
            vendor_id,
            health_code: health_code.into(),
            access_token: String::new(),
            refresh_token: String::new(),
            created_on,
            expires_on,
        }
    }

    pub fn with_tokens(
        mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.access_token = access_token.into();
        self.refresh_token = refresh_token.into();
        self
    }
}

impl PagedRecord for OAuthAccessGrant {
    fn position(&self) -> Position {
        Position::new(self.health_code.clone(), self.health_code.clone())
    }
}
