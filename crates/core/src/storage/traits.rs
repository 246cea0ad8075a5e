use async_trait::async_trait;

use crate::paging::{Page, Result};
use crate::records::{
    ActivityType, OAuthAccessGrant, ReportData, ReportDataKey, ScheduledActivity, Upload,
};

use super::{DateRange, PageParams, TimeRange};

/// Repository for scheduled activity history.
#[async_trait]
pub trait ScheduledActivityRepository: Send + Sync {
    /// Gets one page of a participant's occurrences of an activity,
    /// ordered by scheduled time.
    async fn get_activity_history(
        &self,
        health_code: &str,
        activity_guid: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<ScheduledActivity>>;

    /// Gets one page of a participant's activities of one type that share a
    /// referent, ordered by scheduled time then guid.
    ///
    /// Reads the referent secondary index and hydrates from the base table.
    async fn get_referent_history(
        &self,
        health_code: &str,
        activity_type: ActivityType,
        referent_guid: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<ScheduledActivity>>;
}

/// Repository for report data.
#[async_trait]
pub trait ReportDataRepository: Send + Sync {
    /// Gets one page of a report, ordered by date.
    async fn get_report_data(
        &self,
        key: &ReportDataKey,
        range: DateRange,
        params: &PageParams,
    ) -> Result<Page<ReportData>>;
}

/// Repository for upload metadata.
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Gets one page of a participant's uploads, ordered by request time
    /// then upload id.
    async fn get_uploads(
        &self,
        health_code: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<Upload>>;

    /// Gets one page of every upload in a study, ordered by request time
    /// then upload id.
    ///
    /// Reads the study index, where many participants can share a
    /// request time.
    async fn get_study_uploads(
        &self,
        study_id: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<Upload>>;
}

/// Repository for OAuth access grants.
#[async_trait]
pub trait OAuthGrantRepository: Send + Sync {
    /// Gets one page of the grants a study holds at a vendor, ordered by
    /// health code.
    async fn get_access_grants(
        &self,
        study_id: &str,
        vendor_id: &str,
        params: &PageParams,
    ) -> Result<Page<OAuthAccessGrant>>;
}
