mod error;
mod http_mapping;
pub mod queries;
mod traits;
mod types;

pub use error::{RangeError, RepositoryError, Result};
pub use http_mapping::{paging_error_to_status_code, repository_error_to_status_code};
pub use traits::{
    OAuthGrantRepository, ReportDataRepository, ScheduledActivityRepository, UploadRepository,
};
pub use types::{DateRange, PageParams, TimeRange, MAX_REPORT_RANGE_DAYS};
