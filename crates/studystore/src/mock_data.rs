use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use studystore_core::records::{
    ActivityType, OAuthAccessGrant, ReportData, ReportDataKey, ScheduledActivity, StoredRecord,
    Upload, UploadStatus,
};

/// Participant that owns the demo records.
pub const DEMO_HEALTH_CODE: &str = "demo-participant";
/// Study that owns the demo reports, uploads, and grants.
pub const DEMO_STUDY_ID: &str = "demo-study";

/// Generates demo records for a participant over the 30 days before `now`.
///
/// Several activities share one referent and schedule time so referent
/// history pages cross tie groups, and uploads are requested in bursts that
/// share a timestamp.
pub fn generate_demo_records(now: DateTime<Utc>) -> Vec<StoredRecord> {
    let mut records = Vec::new();
    let start = now - Duration::days(30);

    for day in 0..30 {
        let scheduled_on = start + Duration::days(day);

        records.push(
            ScheduledActivity::new(
                DEMO_HEALTH_CODE,
                "daily-check-in",
                "check-in-survey",
                ActivityType::Survey,
                scheduled_on,
            )
            .into(),
        );

        // Three tasks sharing a referent and a schedule time.
        for slot in ["walk-left", "walk-right", "walk-rest"] {
            let mut activity = ScheduledActivity::new(
                DEMO_HEALTH_CODE,
                slot,
                "walking-task",
                ActivityType::Task,
                scheduled_on,
            );
            if day % 2 == 0 {
                activity.started_on = Some(scheduled_on + Duration::minutes(5));
                activity.finished_on = Some(scheduled_on + Duration::minutes(12));
            }
            records.push(activity.into());
        }
    }

    let first_day = start.date_naive();
    for day in 0..30 {
        let date = first_day + Duration::days(day);
        records.push(report(
            ReportDataKey::study("enrollment", DEMO_STUDY_ID),
            date,
            json!({ "enrolled": 100 + day * 3 }),
        ));
        records.push(report(
            ReportDataKey::participant(DEMO_HEALTH_CODE, "steps", DEMO_STUDY_ID),
            date,
            json!({ "steps": 4000 + (day * 733) % 6000 }),
        ));
    }

    for burst in 0..10 {
        let requested_on = start + Duration::days(burst * 3) + Duration::hours(20);
        for file in 0..3 {
            records.push(
                Upload {
                    upload_id: Uuid::new_v4().to_string(),
                    health_code: DEMO_HEALTH_CODE.to_string(),
                    study_id: DEMO_STUDY_ID.to_string(),
                    requested_on,
                    filename: format!("sensor-{burst}-{file}.zip"),
                    content_length: 1024 * (burst as u64 + 1) * (file + 1),
                    status: if burst % 4 == 3 {
                        UploadStatus::ValidationFailed
                    } else {
                        UploadStatus::Succeeded
                    },
                }
                .into(),
            );
        }
    }

    // The demo participant and a cohort that connected the same vendor.
    let granted_on = start + Duration::days(1);
    records.push(
        OAuthAccessGrant::new(DEMO_STUDY_ID, "fitbit", DEMO_HEALTH_CODE, granted_on, now)
            .with_tokens(Uuid::new_v4().to_string(), Uuid::new_v4().to_string())
            .into(),
    );
    for _ in 0..11 {
        let health_code = Uuid::new_v4().to_string();
        records.push(
            OAuthAccessGrant::new(DEMO_STUDY_ID, "fitbit", health_code, granted_on, now)
                .with_tokens(Uuid::new_v4().to_string(), Uuid::new_v4().to_string())
                .into(),
        );
    }

    records
}

fn report(key: ReportDataKey, date: NaiveDate, data: serde_json::Value) -> StoredRecord {
    ReportData { key, date, data }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use studystore_core::records::RecordKind;

    #[test]
    fn test_demo_records_cover_every_kind() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let records = generate_demo_records(now);

        let count = |kind| records.iter().filter(|r| r.kind() == kind).count();
        assert_eq!(count(RecordKind::ScheduledActivity), 120);
        assert_eq!(count(RecordKind::ReportData), 60);
        assert_eq!(count(RecordKind::Upload), 30);
        assert_eq!(count(RecordKind::OAuthAccessGrant), 12);
    }

    #[test]
    fn test_demo_uploads_have_unique_ids() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let mut ids: Vec<String> = generate_demo_records(now)
            .into_iter()
            .filter_map(|r| match r {
                StoredRecord::Upload(upload) => Some(upload.upload_id),
                _ => None,
            })
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }
}
