use std::env;

use studystore_core::paging::{PagingLimits, DEFAULT_MAX_PAGE_SIZE};

/// Page size used when a request does not name one.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Largest accepted page size (default: 100)
    pub max_page_size: usize,
    /// Page size when the request omits `pageSize` (default: 50)
    pub default_page_size: usize,
    /// Extra index entries read by the widened re-query (default: 100)
    pub widen_by: usize,
    /// Custom DynamoDB endpoint, e.g. a local instance (default: none)
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Scheduled activity table (default: "ScheduledActivity")
    pub activity_table: String,
    /// Report data table (default: "ReportData")
    pub report_table: String,
    /// Upload table (default: "Upload2")
    pub upload_table: String,
    /// OAuth access grant table (default: "OAuthAccessGrant")
    pub grant_table: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MAX_PAGE_SIZE` - Largest accepted page size (default: 100)
    /// - `DEFAULT_PAGE_SIZE` - Page size when none is requested (default: 50)
    /// - `WIDEN_BY` - Extra entries for the widened index re-query (default: 100)
    /// - `AWS_ENDPOINT_URL` - Custom DynamoDB endpoint (default: none)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `ACTIVITY_TABLE`, `REPORT_TABLE`, `UPLOAD_TABLE`, `GRANT_TABLE` - Table names
    pub fn from_env() -> Self {
        let max_page_size = env::var("MAX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_PAGE_SIZE);

        Self {
            max_page_size,
            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, max_page_size),
            widen_by: env::var("WIDEN_BY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_PAGE_SIZE),
            endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            activity_table: env::var("ACTIVITY_TABLE")
                .unwrap_or_else(|_| "ScheduledActivity".to_string()),
            report_table: env::var("REPORT_TABLE").unwrap_or_else(|_| "ReportData".to_string()),
            upload_table: env::var("UPLOAD_TABLE").unwrap_or_else(|_| "Upload2".to_string()),
            grant_table: env::var("GRANT_TABLE")
                .unwrap_or_else(|_| "OAuthAccessGrant".to_string()),
        }
    }

    /// Bounds for the pagination engine.
    pub fn paging_limits(&self) -> PagingLimits {
        PagingLimits {
            max_page_size: self.max_page_size,
            widen_by: self.widen_by,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
