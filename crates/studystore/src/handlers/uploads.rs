//! Upload history handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use studystore_core::records::Upload;
use studystore_core::serde::timestamp_key;

use super::paged::{page_params, time_range, ForwardCursorPagedResourceList};
use crate::{handlers::AppError, state::AppState};

/// Query parameters for listing uploads.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadsQuery {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub offset_key: Option<String>,
    pub page_size: Option<usize>,
}

/// A participant's uploads by request time (GET /v3/participants/{health_code}/uploads).
pub async fn get_uploads(
    State(state): State<AppState>,
    Path(health_code): Path<String>,
    Query(query): Query<UploadsQuery>,
) -> Result<Json<ForwardCursorPagedResourceList<Upload>>, AppError> {
    let range = time_range(query.start_time, query.end_time)?;
    let params = page_params(&state, query.offset_key, query.page_size);

    let page = state
        .uploads
        .get_uploads(&health_code, range, &params)
        .await?;

    tracing::debug!(
        %health_code,
        count = page.items.len(),
        has_next = page.has_next(),
        "Uploads page"
    );

    Ok(Json(
        ForwardCursorPagedResourceList::new(page, &params)
            .with_param("startTime", timestamp_key(&range.start))
            .with_param("endTime", timestamp_key(&range.end)),
    ))
}

/// Every upload in a study by request time (GET /v3/studies/{study_id}/uploads).
pub async fn get_study_uploads(
    State(state): State<AppState>,
    Path(study_id): Path<String>,
    Query(query): Query<UploadsQuery>,
) -> Result<Json<ForwardCursorPagedResourceList<Upload>>, AppError> {
    let range = time_range(query.start_time, query.end_time)?;
    let params = page_params(&state, query.offset_key, query.page_size);

    let page = state
        .uploads
        .get_study_uploads(&study_id, range, &params)
        .await?;

    tracing::debug!(
        %study_id,
        count = page.items.len(),
        has_next = page.has_next(),
        "Study uploads page"
    );

    Ok(Json(
        ForwardCursorPagedResourceList::new(page, &params)
            .with_param("startTime", timestamp_key(&range.start))
            .with_param("endTime", timestamp_key(&range.end)),
    ))
}
