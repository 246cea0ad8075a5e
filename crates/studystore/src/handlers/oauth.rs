//! OAuth access grant handler.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::paged::{page_params, ForwardCursorPagedResourceList};
use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantsQuery {
    pub offset_key: Option<String>,
    pub page_size: Option<usize>,
}

/// Health codes of participants who granted a study access at a vendor
/// (GET /v3/studies/{study_id}/oauth/{vendor_id}).
pub async fn get_health_codes_granting_access(
    State(state): State<AppState>,
    Path((study_id, vendor_id)): Path<(String, String)>,
    Query(query): Query<GrantsQuery>,
) -> Result<Json<ForwardCursorPagedResourceList<String>>, AppError> {
    let params = page_params(&state, query.offset_key, query.page_size);

    let page = state
        .grants
        .get_access_grants(&study_id, &vendor_id, &params)
        .await?;

    tracing::debug!(
        %study_id,
        %vendor_id,
        count = page.items.len(),
        has_next = page.has_next(),
        "Access grants page"
    );

    let page = page.map(|grant| grant.health_code);
    Ok(Json(ForwardCursorPagedResourceList::new(page, &params)))
}
