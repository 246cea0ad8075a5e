//! Page requests for each repository call.
//!
//! Every backend builds its requests here so the key layout of a query
//! shape is defined once.

use crate::paging::{KeyCodec, PageRequest, SortRange};
use crate::records::{grant_key, referent_bucket, ActivityType, ReportDataKey};

use super::{DateRange, PageParams, TimeRange};

/// Direct range over one activity's occurrences in the base table.
pub fn activity_history_request(
    health_code: &str,
    activity_guid: &str,
    range: &TimeRange,
    params: &PageParams,
) -> PageRequest {
    PageRequest {
        partition: health_code.to_string(),
        range: range.sort_range(),
        keys: KeyCodec::bucketed(activity_guid),
        cursor: params.offset_key.clone(),
        page_size: params.page_size,
    }
}

/// Referent index range for one referent and activity type.
pub fn referent_history_request(
    health_code: &str,
    activity_type: ActivityType,
    referent_guid: &str,
    range: &TimeRange,
    params: &PageParams,
) -> PageRequest {
    PageRequest {
        partition: health_code.to_string(),
        range: range.sort_range(),
        keys: KeyCodec::bucketed(referent_bucket(referent_guid, activity_type)),
        cursor: params.offset_key.clone(),
        page_size: params.page_size,
    }
}

/// Direct range over the days of one report.
pub fn report_data_request(
    key: &ReportDataKey,
    range: &DateRange,
    params: &PageParams,
) -> PageRequest {
    PageRequest {
        partition: key.key_string(),
        range: range.sort_range(),
        keys: KeyCodec::plain(),
        cursor: params.offset_key.clone(),
        page_size: params.page_size,
    }
}

/// Request-time index range over a participant's uploads.
pub fn uploads_request(health_code: &str, range: &TimeRange, params: &PageParams) -> PageRequest {
    PageRequest {
        partition: health_code.to_string(),
        range: range.sort_range(),
        keys: KeyCodec::plain(),
        cursor: params.offset_key.clone(),
        page_size: params.page_size,
    }
}

/// Request-time index range over every upload in a study.
pub fn study_uploads_request(
    study_id: &str,
    range: &TimeRange,
    params: &PageParams,
) -> PageRequest {
    PageRequest {
        partition: study_id.to_string(),
        range: range.sort_range(),
        keys: KeyCodec::plain(),
        cursor: params.offset_key.clone(),
        page_size: params.page_size,
    }
}

/// Sort range covering any health code. Key attributes cannot be empty, so
/// the range starts at the first printable character.
fn all_health_codes() -> SortRange {
    SortRange::new(" ", char::MAX.to_string())
}

/// Direct range over the grants of one study and vendor.
pub fn access_grants_request(study_id: &str, vendor_id: &str, params: &PageParams) -> PageRequest {
    PageRequest {
        partition: grant_key(study_id, vendor_id),
        range: all_health_codes(),
        keys: KeyCodec::plain(),
        cursor: params.offset_key.clone(),
        page_size: params.page_size,
    }
}
