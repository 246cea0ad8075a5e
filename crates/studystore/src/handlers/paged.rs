//! Forward-cursor list responses shared by the history endpoints.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use studystore_core::paging::Page;
use studystore_core::storage::{PageParams, RangeError, TimeRange};

use crate::state::AppState;

const LIST_TYPE: &str = "ForwardCursorPagedResourceList";

/// Length of the time window when a request omits its start.
pub const DEFAULT_WINDOW_DAYS: i64 = 14;

/// A page of items with the key that resumes after it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardCursorPagedResourceList<T> {
    pub items: Vec<T>,
    pub next_page_offset_key: Option<String>,
    pub has_next: bool,
    /// Echo of the parameters that produced the page.
    pub request_params: Map<String, Value>,
    #[serde(rename = "type")]
    pub list_type: &'static str,
}

impl<T> ForwardCursorPagedResourceList<T> {
    pub fn new(page: Page<T>, params: &PageParams) -> Self {
        let has_next = page.has_next();
        let mut request_params = Map::new();
        request_params.insert("pageSize".to_string(), Value::from(params.page_size));
        if let Some(offset_key) = &params.offset_key {
            request_params.insert("offsetKey".to_string(), Value::from(offset_key.clone()));
        }

        Self {
            items: page.items,
            next_page_offset_key: page.next_cursor,
            has_next,
            request_params,
            list_type: LIST_TYPE,
        }
    }

    /// Adds a parameter to the echoed request parameters.
    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.request_params.insert(name.to_string(), value.into());
        self
    }
}

/// Page parameters from the query string, applying the configured default
/// page size. Bounds are enforced by the pagination engine.
pub fn page_params(
    state: &AppState,
    offset_key: Option<String>,
    page_size: Option<usize>,
) -> PageParams {
    PageParams::new(
        offset_key.filter(|key| !key.is_empty()),
        page_size.unwrap_or(state.default_page_size),
    )
}

/// Time range from optional bounds. The end defaults to now and the start
/// to [`DEFAULT_WINDOW_DAYS`] before the end.
pub fn time_range(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<TimeRange, RangeError> {
    let end = end.unwrap_or_else(Utc::now);
    let start = start.unwrap_or(end - Duration::days(DEFAULT_WINDOW_DAYS));
    TimeRange::new(start, end)
}
