//! Report data handler.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use studystore_core::records::{ReportData, ReportDataKey};
use studystore_core::storage::{DateRange, MAX_REPORT_RANGE_DAYS};

use super::paged::{page_params, ForwardCursorPagedResourceList};
use crate::{handlers::AppError, state::AppState};

/// Query parameters for report data. Missing dates default to yesterday.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDataQuery {
    /// First day, inclusive (YYYY-MM-DD)
    pub start_time: Option<NaiveDate>,
    /// Last day, inclusive (YYYY-MM-DD)
    pub end_time: Option<NaiveDate>,
    /// Participant whose report is read; absent for a study report
    pub health_code: Option<String>,
    pub offset_key: Option<String>,
    pub page_size: Option<usize>,
}

/// Days of a study or participant report (GET /v4/studies/{study_id}/reports/{identifier}).
pub async fn get_report_data(
    State(state): State<AppState>,
    Path((study_id, identifier)): Path<(String, String)>,
    Query(query): Query<ReportDataQuery>,
) -> Result<Json<ForwardCursorPagedResourceList<ReportData>>, AppError> {
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let range = DateRange::bounded(
        query.start_time.unwrap_or(yesterday),
        query.end_time.unwrap_or(yesterday),
        MAX_REPORT_RANGE_DAYS,
    )?;
    let params = page_params(&state, query.offset_key, query.page_size);

    let key = match query.health_code {
        Some(health_code) => ReportDataKey::participant(health_code, identifier, study_id),
        None => ReportDataKey::study(identifier, study_id),
    };

    let page = state.reports.get_report_data(&key, range, &params).await?;

    tracing::debug!(
        report = %key,
        count = page.items.len(),
        has_next = page.has_next(),
        "Report data page"
    );

    Ok(Json(
        ForwardCursorPagedResourceList::new(page, &params)
            .with_param("startTime", range.start.to_string())
            .with_param("endTime", range.end.to_string()),
    ))
}
