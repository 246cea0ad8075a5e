//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `studystore_core::storage` over one
//! table per record kind.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;

use studystore_core::paging::{Page, PageSource, PaginationEngine, Result};
use studystore_core::records::{
    ActivityType, OAuthAccessGrant, RecordKind, ReportData, ReportDataKey, ScheduledActivity,
    StoredRecord, Upload, ACTIVITY_SCHEMA, GRANT_SCHEMA, REPORT_SCHEMA, UPLOAD_SCHEMA,
    UPLOAD_STUDY_SCHEMA,
};
use studystore_core::storage::{
    queries, DateRange, OAuthGrantRepository, PageParams, ReportDataRepository,
    ScheduledActivityRepository, TimeRange, UploadRepository,
};

use super::table::DynamoTable;
use crate::config::Config;

/// DynamoDB-based repository implementation.
pub struct DynamoDbRepository {
    engine: PaginationEngine,
    activities: DynamoTable,
    reports: DynamoTable,
    uploads: DynamoTable,
    /// The upload table queried through its study index.
    study_uploads: DynamoTable,
    grants: DynamoTable,
}

impl DynamoDbRepository {
    /// Creates a repository over the tables named in `config`.
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            engine: PaginationEngine::new(config.paging_limits()),
            activities: DynamoTable::new(
                client.clone(),
                &config.activity_table,
                &ACTIVITY_SCHEMA,
            ),
            reports: DynamoTable::new(client.clone(), &config.report_table, &REPORT_SCHEMA),
            uploads: DynamoTable::new(client.clone(), &config.upload_table, &UPLOAD_SCHEMA),
            study_uploads: DynamoTable::new(
                client.clone(),
                &config.upload_table,
                &UPLOAD_STUDY_SCHEMA,
            ),
            grants: DynamoTable::new(client, &config.grant_table, &GRANT_SCHEMA),
        }
    }

    /// Creates a repository using the AWS SDK default credential chain.
    ///
    /// `AWS_ENDPOINT_URL` points the client at a local DynamoDB instance.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        tracing::info!(
            region = %config.region,
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            "DynamoDB client configured"
        );

        Self::new(Client::new(&sdk_config), config)
    }

    /// Writes a record to the table for its kind.
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
impl ScheduledActivityRepository for DynamoDbRepository {
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
impl ReportDataRepository for DynamoDbRepository {
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
impl UploadRepository for DynamoDbRepository {
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
impl OAuthGrantRepository for DynamoDbRepository {
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
