//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds repository trait objects so handlers do not
//! depend on the backend selected by feature flags.

use std::sync::Arc;

use chrono::Utc;
use studystore_core::records::StoredRecord;
use studystore_core::storage::{
    OAuthGrantRepository, ReportDataRepository, ScheduledActivityRepository, UploadRepository,
};

use crate::config::Config;
use crate::mock_data::generate_demo_records;

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Scheduled activity history.
    pub activities: Arc<dyn ScheduledActivityRepository>,
    /// Report data.
    pub reports: Arc<dyn ReportDataRepository>,
    /// Upload metadata.
    pub uploads: Arc<dyn UploadRepository>,
    /// OAuth access grants.
    pub grants: Arc<dyn OAuthGrantRepository>,
    /// Page size used when a request omits `pageSize`.
    pub default_page_size: usize,
}

impl AppState {
    /// Creates a new AppState sharing one repository across all traits.
    fn build<R>(repo: Arc<R>, config: &Config) -> Self
    where
        R: ScheduledActivityRepository
            + ReportDataRepository
            + UploadRepository
            + OAuthGrantRepository
            + 'static,
    {
        Self {
            activities: repo.clone(),
            reports: repo.clone(),
            uploads: repo.clone(),
            grants: repo,
            default_page_size: config.default_page_size,
        }
    }
}

fn demo_records() -> Vec<StoredRecord> {
    generate_demo_records(Utc::now())
}

// ============================================================================
// Factory functions for each storage backend
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for testing without any external dependencies.
        pub async fn new(config: &Config, seed_demo: bool) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new(config.paging_limits()));

            if seed_demo {
                let records = demo_records();
                let count = records.len();
                for record in records {
                    repo.insert(record).await?;
                }
                tracing::info!(count, "Seeded demo records");
            }

            Ok(Self::build(repo, config))
        }
    }
}

#[cfg(feature = "dynamodb")]
mod dynamodb_backend {
    use super::*;
    use crate::storage::DynamoDbRepository;

    impl AppState {
        /// Creates AppState with DynamoDB storage.
        pub async fn new(config: &Config, seed_demo: bool) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(DynamoDbRepository::from_config(config).await);

            if seed_demo {
                let records = demo_records();
                let count = records.len();
                for record in records {
                    repo.insert(record).await?;
                }
                tracing::info!(count, "Seeded demo records");
            }

            Ok(Self::build(repo, config))
        }
    }
}

// ============================================================================
// Test support
// ============================================================================
