//! Scheduled activity history handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use studystore_core::records::{ActivityType, ScheduledActivity};
use studystore_core::serde::timestamp_key;

use super::paged::{page_params, time_range, ForwardCursorPagedResourceList};
use crate::{handlers::AppError, state::AppState};

/// Query parameters for activity history.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityHistoryQuery {
    /// Inclusive start of the schedule window (ISO 8601)
    pub scheduled_on_start: Option<DateTime<Utc>>,
    /// Exclusive end of the schedule window (default: now)
    pub scheduled_on_end: Option<DateTime<Utc>>,
    pub offset_key: Option<String>,
    pub page_size: Option<usize>,
}

/// Occurrences of one activity (GET /v3/participants/{health_code}/activities/{activity_guid}).
pub async fn get_activity_history(
    State(state): State<AppState>,
    Path((health_code, activity_guid)): Path<(String, String)>,
    Query(query): Query<ActivityHistoryQuery>,
) -> Result<Json<ForwardCursorPagedResourceList<ScheduledActivity>>, AppError> {
    let range = time_range(query.scheduled_on_start, query.scheduled_on_end)?;
    let params = page_params(&state, query.offset_key, query.page_size);

    let page = state
        .activities
        .get_activity_history(&health_code, &activity_guid, range, &params)
        .await?;

    tracing::debug!(
        %health_code,
        %activity_guid,
        count = page.items.len(),
        has_next = page.has_next(),
        "Activity history page"
    );

    Ok(Json(
        ForwardCursorPagedResourceList::new(page, &params)
            .with_param("scheduledOnStart", timestamp_key(&range.start))
            .with_param("scheduledOnEnd", timestamp_key(&range.end)),
    ))
}

/// Activities sharing a referent (GET /v4/participants/{health_code}/activities/{activity_type}/{referent_guid}).
pub async fn get_referent_history(
    State(state): State<AppState>,
    Path((health_code, activity_type, referent_guid)): Path<(String, ActivityType, String)>,
    Query(query): Query<ActivityHistoryQuery>,
) -> Result<Json<ForwardCursorPagedResourceList<ScheduledActivity>>, AppError> {
    let range = time_range(query.scheduled_on_start, query.scheduled_on_end)?;
    let params = page_params(&state, query.offset_key, query.page_size);

    let page = state
        .activities
        .get_referent_history(&health_code, activity_type, &referent_guid, range, &params)
        .await?;

    tracing::debug!(
        %health_code,
        activity_type = activity_type.as_str(),
        %referent_guid,
        count = page.items.len(),
        has_next = page.has_next(),
        "Referent history page"
    );

    Ok(Json(
        ForwardCursorPagedResourceList::new(page, &params)
            .with_param("scheduledOnStart", timestamp_key(&range.start))
            .with_param("scheduledOnEnd", timestamp_key(&range.end)),
    ))
}
