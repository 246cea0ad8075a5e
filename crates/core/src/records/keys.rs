//! Key layout of the record tables.
//!
//! Pure functions for building composite sort and index keys, plus the
//! attribute layout of each table.

use chrono::{DateTime, Utc};

use crate::paging::KEY_SEPARATOR;
use crate::serde::timestamp_key;

use super::kind::{IndexSchema, RecordKind, TableSchema};
use super::types::ActivityType;

pub const ACTIVITY_REFERENT_INDEX: &str = "healthCode-referentGuid-index";
pub const UPLOAD_REQUESTED_ON_INDEX: &str = "healthCode-requestedOn-index";
pub const UPLOAD_STUDY_INDEX: &str = "studyId-requestedOn-index";

pub static ACTIVITY_SCHEMA: TableSchema = TableSchema {
    kind: RecordKind::ScheduledActivity,
    partition_attr: "healthCode",
    sort_attr: Some("guid"),
    index: Some(IndexSchema {
        name: ACTIVITY_REFERENT_INDEX,
        partition_attr: "healthCode",
        value_attr: "referentGuid",
        id_attr: "guid",
    }),
};

pub static REPORT_SCHEMA: TableSchema = TableSchema {
    kind: RecordKind::ReportData,
    partition_attr: "key",
    sort_attr: Some("date"),
    index: None,
};

pub static UPLOAD_SCHEMA: TableSchema = TableSchema {
    kind: RecordKind::Upload,
    partition_attr: "uploadId",
    sort_attr: None,
    index: Some(IndexSchema {
        name: UPLOAD_REQUESTED_ON_INDEX,
        partition_attr: "healthCode",
        value_attr: "requestedOn",
        id_attr: "uploadId",
    }),
};

/// The upload table seen through its study index.
pub static UPLOAD_STUDY_SCHEMA: TableSchema = TableSchema {
    kind: RecordKind::Upload,
    partition_attr: "uploadId",
    sort_attr: None,
    index: Some(IndexSchema {
        name: UPLOAD_STUDY_INDEX,
        partition_attr: "studyId",
        value_attr: "requestedOn",
        id_attr: "uploadId",
    }),
};

pub static GRANT_SCHEMA: TableSchema = TableSchema {
    kind: RecordKind::OAuthAccessGrant,
    partition_attr: "key",
    sort_attr: Some("healthCode"),
    index: None,
};

/// Partition of the grants one study holds at one vendor.
///
/// Pattern: `<study_id>:<vendor_id>`
pub fn grant_key(study_id: &str, vendor_id: &str) -> String {
    format!("{study_id}{KEY_SEPARATOR}{vendor_id}")
}

/// Sort key of a scheduled activity.
///
/// Pattern: `<activity_guid>:<scheduled_on>`
pub fn activity_guid_key(activity_guid: &str, scheduled_on: &DateTime<Utc>) -> String {
    format!(
        "{activity_guid}{KEY_SEPARATOR}{}",
        timestamp_key(scheduled_on)
    )
}

/// Bucket of the referent index for one referent and activity type.
///
/// Pattern: `<referent_guid>:<activity_type>`
pub fn referent_bucket(referent_guid: &str, activity_type: ActivityType) -> String {
    format!("{referent_guid}{KEY_SEPARATOR}{}", activity_type.as_str())
}

/// Referent index value of a scheduled activity.
///
/// Pattern: `<referent_guid>:<activity_type>:<scheduled_on>`
pub fn referent_index_value(
    referent_guid: &str,
    activity_type: ActivityType,
    scheduled_on: &DateTime<Utc>,
) -> String {
    format!(
        "{}{KEY_SEPARATOR}{}",
        referent_bucket(referent_guid, activity_type),
        timestamp_key(scheduled_on)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scheduled_on() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_activity_guid_key_format() {
        assert_eq!(
            activity_guid_key("activity-1", &scheduled_on()),
            "activity-1:2024-03-01T09:30:00.000Z"
        );
    }

    #[test]
    fn test_referent_bucket_format() {
        assert_eq!(
            referent_bucket("referent-1", ActivityType::Survey),
            "referent-1:survey"
        );
    }

    #[test]
    fn test_referent_index_value_format() {
        assert_eq!(
            referent_index_value("referent-1", ActivityType::Task, &scheduled_on()),
            "referent-1:task:2024-03-01T09:30:00.000Z"
        );
    }

    #[test]
    fn test_referent_index_value_starts_with_bucket() {
        let bucket = referent_bucket("referent-1", ActivityType::Compound);
        let value = referent_index_value("referent-1", ActivityType::Compound, &scheduled_on());
        assert!(value.starts_with(&format!("{bucket}:")));
    }

    #[test]
    fn test_schemas_match_kinds() {
        assert_eq!(ACTIVITY_SCHEMA.kind, RecordKind::ScheduledActivity);
        assert_eq!(REPORT_SCHEMA.kind, RecordKind::ReportData);
        assert_eq!(UPLOAD_SCHEMA.kind, RecordKind::Upload);
        assert!(REPORT_SCHEMA.index.is_none());
        assert!(UPLOAD_SCHEMA.sort_attr.is_none());
        assert_eq!(GRANT_SCHEMA.kind, RecordKind::OAuthAccessGrant);
    }

    #[test]
    fn test_upload_views_share_a_primary_key() {
        assert_eq!(UPLOAD_STUDY_SCHEMA.kind, UPLOAD_SCHEMA.kind);
        assert_eq!(UPLOAD_STUDY_SCHEMA.partition_attr, UPLOAD_SCHEMA.partition_attr);
        assert_ne!(UPLOAD_STUDY_SCHEMA.index, UPLOAD_SCHEMA.index);
    }

    #[test]
    fn test_grant_key_format() {
        assert_eq!(grant_key("study-1", "fitbit"), "study-1:fitbit");
    }
}
