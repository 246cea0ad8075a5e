//! In-memory repository implementation.

use async_trait::async_trait;

use studystore_core::paging::{Page, PageSource, PaginationEngine, PagingLimits, Result};
use studystore_core::records::{
    ActivityType, OAuthAccessGrant, RecordKind, ReportData, ReportDataKey, ScheduledActivity,
    StoredRecord, Upload, ACTIVITY_SCHEMA, GRANT_SCHEMA, REPORT_SCHEMA, UPLOAD_SCHEMA,
    UPLOAD_STUDY_SCHEMA,
};
use studystore_core::storage::{
    queries, DateRange, OAuthGrantRepository, PageParams, ReportDataRepository,
    ScheduledActivityRepository, TimeRange, UploadRepository,
};

use super::table::MemoryTable;

/// In-memory storage backend.
///
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug)]
pub struct InMemoryRepository {
    engine: PaginationEngine,
    activities: MemoryTable,
    reports: MemoryTable,
    uploads: MemoryTable,
    study_uploads: MemoryTable,
    grants: MemoryTable,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new(PagingLimits::default())
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new(limits: PagingLimits) -> Self {
        let uploads = MemoryTable::new(&UPLOAD_SCHEMA);
        Self {
            engine: PaginationEngine::new(limits),
            activities: MemoryTable::new(&ACTIVITY_SCHEMA),
            reports: MemoryTable::new(&REPORT_SCHEMA),
            study_uploads: uploads.index_view(&UPLOAD_STUDY_SCHEMA),
            uploads,
            grants: MemoryTable::new(&GRANT_SCHEMA),
        }
    }

    /// Stores a record in the table for its kind.
    pub async fn insert(
        &self,
        record: impl Into<StoredRecord>,
    ) -> studystore_core::storage::Result<()> {
        let record = record.into();
        let table = match record.kind() {
            RecordKind::ScheduledActivity => &self.activities,
            RecordKind::ReportData => &self.reports,
            RecordKind::Upload => &self.uploads,
            RecordKind::OAuthAccessGrant => &self.grants,
        };
        table.put(&record).await
    }
}

#[async_trait]
impl ScheduledActivityRepository for InMemoryRepository {
    async fn get_activity_history(
        &self,
        health_code: &str,
        activity_guid: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<ScheduledActivity>> {
        let request = queries::activity_history_request(health_code, activity_guid, &range, params);
        self.engine
            .fetch_page(PageSource::Direct(&self.activities), &request)
            .await
    }

    async fn get_referent_history(
        &self,
        health_code: &str,
        activity_type: ActivityType,
        referent_guid: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<ScheduledActivity>> {
        let request = queries::referent_history_request(
            health_code,
            activity_type,
            referent_guid,
            &range,
            params,
        );
        let source = PageSource::SecondaryIndex {
            index: &self.activities,
            hydrator: &self.activities,
        };
        self.engine.fetch_page(source, &request).await
    }
}

#[async_trait]
impl ReportDataRepository for InMemoryRepository {
    async fn get_report_data(
        &self,
        key: &ReportDataKey,
        range: DateRange,
        params: &PageParams,
    ) -> Result<Page<ReportData>> {
        let request = queries::report_data_request(key, &range, params);
        self.engine
            .fetch_page(PageSource::Direct(&self.reports), &request)
            .await
    }
}

#[async_trait]
impl UploadRepository for InMemoryRepository {
    async fn get_uploads(
        &self,
        health_code: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<Upload>> {
        let request = queries::uploads_request(health_code, &range, params);
        let source = PageSource::SecondaryIndex {
            index: &self.uploads,
            hydrator: &self.uploads,
        };
        self.engine.fetch_page(source, &request).await
    }

    async fn get_study_uploads(
        &self,
        study_id: &str,
        range: TimeRange,
        params: &PageParams,
    ) -> Result<Page<Upload>> {
        let request = queries::study_uploads_request(study_id, &range, params);
        let source = PageSource::SecondaryIndex {
            index: &self.study_uploads,
            hydrator: &self.study_uploads,
        };
        self.engine.fetch_page(source, &request).await
    }
}

#[async_trait]
impl OAuthGrantRepository for InMemoryRepository {
    async fn get_access_grants(
        &self,
        study_id: &str,
        vendor_id: &str,
        params: &PageParams,
    ) -> Result<Page<OAuthAccessGrant>> {
        let request = queries::access_grants_request(study_id, vendor_id, params);
        self.engine
            .fetch_page(PageSource::Direct(&self.grants), &request)
            .await
    }
}
