//! Page fetching orchestration.

use tracing::{debug, info, warn};

use crate::records::{KindedRecord, StoredRecord};
use crate::storage::RepositoryError;

use super::assembler::{assemble, PagedRecord};
use super::cursor::Cursor;
use super::error::{PagingError, Result};
use super::planner::{plan, widen, Strategy};
use super::resolver::{resolve, sort_window};
use super::store::{Hydrator, IndexQuery, PageSource, RangeQuery};
use super::types::{Page, PageRequest, PagingLimits};

/// Stateless forward-cursor pagination over a range-keyed store.
///
/// Each call issues at most three sequential round trips: the range or
/// index query, one widened index re-query, and one batch hydration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationEngine {
    limits: PagingLimits,
}

impl PaginationEngine {
    pub fn new(limits: PagingLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> PagingLimits {
        self.limits
    }

    /// Fetches one page of `R` records.
    pub async fn fetch_page<R>(
        &self,
        source: PageSource<'_>,
        request: &PageRequest,
    ) -> Result<Page<R>>
    where
        R: KindedRecord + PagedRecord,
    {
        self.validate_page_size(request.page_size)?;

        let cursor = request
            .cursor
            .as_deref()
            .map(Cursor::decode)
            .transpose()
            .map_err(|e| PagingError::BadRequest(e.to_string()))?;

        if let Some(cursor) = &cursor {
            let range = &request.range;
            if cursor.value < range.start || cursor.value >= range.end {
                warn!(
                    offset_key = %cursor.value,
                    start = %range.start,
                    end = %range.end,
                    "Offset key outside the requested range"
                );
                return Err(PagingError::InvalidCursor(cursor.value.clone()));
            }
        }

        match source {
            PageSource::Direct(table) => self.fetch_direct(table, request, cursor).await,
            PageSource::SecondaryIndex { index, hydrator } => {
                self.fetch_indexed(index, hydrator, request, cursor).await
            }
        }
    }

    fn validate_page_size(&self, page_size: usize) -> Result<()> {
        if page_size == 0 || page_size > self.limits.max_page_size {
            return Err(PagingError::BadRequest(format!(
                "pageSize must be from 1-{} records",
                self.limits.max_page_size
            )));
        }
        Ok(())
    }

    async fn fetch_direct<R: KindedRecord>(
        &self,
        table: &dyn RangeQuery,
        request: &PageRequest,
        cursor: Option<Cursor>,
    ) -> Result<Page<R>> {
        let spec = plan(
            Strategy::Direct,
            &request.partition,
            &request.range,
            &request.keys,
            cursor.as_ref(),
            request.page_size,
        );
        debug!(
            partition = %spec.partition,
            lower = %spec.lower,
            upper = %spec.upper,
            limit = spec.limit,
            "Querying range"
        );

        let slice = table.query_range(&spec).await?;
        let items = decode_all::<R>(slice.items)?;

        let next_cursor = match slice.last_evaluated {
            Some(key) => {
                let value = request.keys.value_component(&key).ok_or_else(|| {
                    RepositoryError::InvalidData(format!(
                        "continuation key {key} is outside the queried bucket"
                    ))
                })?;
                Some(Cursor::new(value, None).encode())
            }
            None => None,
        };

        Ok(Page { items, next_cursor })
    }

    async fn fetch_indexed<R>(
        &self,
        index: &dyn IndexQuery,
        hydrator: &dyn Hydrator,
        request: &PageRequest,
        cursor: Option<Cursor>,
    ) -> Result<Page<R>>
    where
        R: KindedRecord + PagedRecord,
    {
        let position = match &cursor {
            Some(cursor) => Some(request.keys.position_of(cursor).ok_or_else(|| {
                PagingError::BadRequest("offset key is missing its record identifier".to_string())
            })?),
            None => None,
        };

        let spec = plan(
            Strategy::SecondaryIndex,
            &request.partition,
            &request.range,
            &request.keys,
            cursor.as_ref(),
            request.page_size,
        );
        debug!(
            partition = %spec.partition,
            lower = %spec.lower,
            upper = %spec.upper,
            limit = spec.limit,
            "Querying index"
        );

        let mut window = index.query_index(&spec).await?;
        sort_window(&mut window.entries);
        let mut resolution = resolve(
            &window.entries,
            window.exhausted,
            position.as_ref(),
            request.page_size,
        );

        if resolution.needs_retry {
            let widened = widen(&spec, self.limits.widen_by);
            info!(
                partition = %spec.partition,
                cursor_found = resolution.cursor_found,
                limit = widened.limit,
                "Re-querying index with widened window"
            );

            window = index.query_index(&widened).await?;
            sort_window(&mut window.entries);
            resolution = resolve(
                &window.entries,
                window.exhausted,
                position.as_ref(),
                request.page_size,
            );

            if !resolution.cursor_found {
                let value = cursor.map(|c| c.value).unwrap_or_default();
                warn!(
                    partition = %spec.partition,
                    offset_key = %value,
                    "Offset key not found in index"
                );
                return Err(PagingError::InvalidCursor(value));
            }
            if resolution.needs_retry {
                warn!(
                    partition = %spec.partition,
                    entries = window.entries.len(),
                    "Tie group exceeds widened window, page may be incomplete"
                );
            }
        }

        let start = resolution.start_index.min(window.entries.len());
        let page_end = start + request.page_size;
        let boundary = window
            .entries
            .get(page_end.saturating_sub(1))
            .filter(|_| window.entries.len() > page_end)
            .map(|entry| entry.position());
        let keys: Vec<_> = window.entries[start..page_end.min(window.entries.len())]
            .iter()
            .map(|entry| entry.key.clone())
            .collect();

        if keys.is_empty() {
            return Ok(Page::empty());
        }

        let stored = hydrator.hydrate(&keys).await?;
        if stored.len() < keys.len() {
            warn!(
                partition = %spec.partition,
                requested = keys.len(),
                loaded = stored.len(),
                "Index entries without a base record, skipping"
            );
        } else {
            debug!(requested = keys.len(), loaded = stored.len(), "Hydrated index entries");
        }

        let records = decode_all::<R>(stored)?;
        assemble(records, request.page_size, boundary.as_ref(), &request.keys)
    }
}

fn decode_all<R: KindedRecord>(stored: Vec<StoredRecord>) -> Result<Vec<R>> {
    stored
        .into_iter()
        .map(|record| {
            R::from_stored(record).map_err(|other| PagingError::HydrationInconsistency {
                expected: R::KIND,
                found: other.kind(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;
    use crate::paging::{
        IndexEntry, IndexWindow, KeyCodec, PrimaryKey, QuerySpec, RangeSlice, SortRange,
    };
    use crate::records::{
        activity_guid_key, ActivityType, RecordKind, ScheduledActivity, Upload, UploadStatus,
    };
    use crate::serde::timestamp_key;
    use crate::storage::Result as StoreResult;

    fn at(minute: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::minutes(minute)
    }

    fn upload(id: &str, minute: i64) -> Upload {
        Upload {
            upload_id: id.to_string(),
            health_code: "hc-1".to_string(),
            study_id: "study-1".to_string(),
            requested_on: at(minute),
            filename: format!("{id}.zip"),
            content_length: 1024,
            status: UploadStatus::Succeeded,
        }
    }

    fn distinct_uploads(count: i64) -> Vec<Upload> {
        (1..=count)
            .map(|n| upload(&format!("u-{n:02}"), n))
            .collect()
    }

    /// Index over uploads by request time. Ties come back in insertion order
    /// and hydration returns records in reverse request order.
    struct FakeUploads {
        rows: Vec<Upload>,
        index_queries: AtomicUsize,
    }

    impl FakeUploads {
        fn new(rows: Vec<Upload>) -> Self {
            Self {
                rows,
                index_queries: AtomicUsize::new(0),
            }
        }

        fn queries(&self) -> usize {
            self.index_queries.load(Ordering::SeqCst)
        }

        fn source(&self) -> PageSource<'_> {
            PageSource::SecondaryIndex {
                index: self,
                hydrator: self,
            }
        }
    }

    #[async_trait]
    impl IndexQuery for FakeUploads {
        async fn query_index(&self, spec: &QuerySpec) -> StoreResult<IndexWindow> {
            self.index_queries.fetch_add(1, Ordering::SeqCst);

            let mut matched: Vec<IndexEntry> = self
                .rows
                .iter()
                .filter(|u| u.health_code == spec.partition)
                .map(|u| IndexEntry {
                    partition: u.health_code.clone(),
                    index_value: timestamp_key(&u.requested_on),
                    id: u.upload_id.clone(),
                    key: PrimaryKey::hash_only(u.upload_id.clone()),
                })
                .filter(|e| e.index_value >= spec.lower && e.index_value < spec.upper)
                .collect();
            matched.sort_by(|a, b| a.index_value.cmp(&b.index_value));

            let exhausted = matched.len() < spec.limit;
            matched.truncate(spec.limit);
            Ok(IndexWindow {
                entries: matched,
                exhausted,
            })
        }
    }

    #[async_trait]
    impl Hydrator for FakeUploads {
        async fn hydrate(&self, keys: &[PrimaryKey]) -> StoreResult<Vec<StoredRecord>> {
            Ok(keys
                .iter()
                .rev()
                .filter_map(|key| self.rows.iter().find(|u| u.upload_id == key.partition))
                .cloned()
                .map(StoredRecord::from)
                .collect())
        }
    }

    /// Hydrates through `store` but has lost the base record for `missing`.
    struct StaleHydrator<'a> {
        store: &'a FakeUploads,
        missing: &'static str,
    }

    #[async_trait]
    impl Hydrator for StaleHydrator<'_> {
        async fn hydrate(&self, keys: &[PrimaryKey]) -> StoreResult<Vec<StoredRecord>> {
            let keys: Vec<PrimaryKey> = keys
                .iter()
                .filter(|key| key.partition != self.missing)
                .cloned()
                .collect();
            self.store.hydrate(&keys).await
        }
    }

    struct WrongKindHydrator;

    #[async_trait]
    impl Hydrator for WrongKindHydrator {
        async fn hydrate(&self, _keys: &[PrimaryKey]) -> StoreResult<Vec<StoredRecord>> {
            Ok(vec![StoredRecord::from(ScheduledActivity::new(
                "hc-1",
                "activity-1",
                "referent-1",
                ActivityType::Task,
                at(1),
            ))])
        }
    }

    /// Base table of scheduled activities keyed by `guid`.
    struct FakeActivities {
        rows: Vec<ScheduledActivity>,
    }

    #[async_trait]
    impl RangeQuery for FakeActivities {
        async fn query_range(&self, spec: &QuerySpec) -> StoreResult<RangeSlice> {
            let mut matched: Vec<&ScheduledActivity> = self
                .rows
                .iter()
                .filter(|a| a.health_code == spec.partition)
                .filter(|a| a.guid >= spec.lower && a.guid < spec.upper)
                .filter(|a| spec.exclusive_start.as_ref().is_none_or(|start| &a.guid > start))
                .collect();
            matched.sort_by(|a, b| a.guid.cmp(&b.guid));

            let more = matched.len() > spec.limit;
            matched.truncate(spec.limit);
            let last_evaluated = if more {
                matched.last().map(|a| a.guid.clone())
            } else {
                None
            };

            Ok(RangeSlice {
                items: matched.into_iter().cloned().map(StoredRecord::from).collect(),
                last_evaluated,
            })
        }
    }

    fn range() -> SortRange {
        SortRange::new(timestamp_key(&at(0)), timestamp_key(&at(1_000)))
    }

    fn request(cursor: Option<String>, page_size: usize) -> PageRequest {
        PageRequest {
            partition: "hc-1".to_string(),
            range: range(),
            keys: KeyCodec::plain(),
            cursor,
            page_size,
        }
    }

    fn ids(page: &Page<Upload>) -> Vec<String> {
        page.items.iter().map(|u| u.upload_id.clone()).collect()
    }

    async fn fetch_all(
        engine: &PaginationEngine,
        store: &FakeUploads,
        page_size: usize,
    ) -> Vec<Page<Upload>> {
        let mut pages = Vec::new();
        let mut cursor = None;
        loop {
            let page = engine
                .fetch_page::<Upload>(store.source(), &request(cursor, page_size))
                .await
                .unwrap();
            cursor = page.next_cursor.clone();
            pages.push(page);
            if cursor.is_none() {
                return pages;
            }
        }
    }

    #[tokio::test]
    async fn test_twelve_items_in_pages_of_five() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(12));

        let pages = fetch_all(&engine, &store, 5).await;

        assert_eq!(pages.len(), 3);
        assert_eq!(ids(&pages[0]), vec!["u-01", "u-02", "u-03", "u-04", "u-05"]);
        assert_eq!(ids(&pages[1]), vec!["u-06", "u-07", "u-08", "u-09", "u-10"]);
        assert_eq!(ids(&pages[2]), vec!["u-11", "u-12"]);

        let first = Cursor::decode(pages[0].next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(first, Cursor::new(timestamp_key(&at(5)), Some("u-05".to_string())));
        let second = Cursor::decode(pages[1].next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(second, Cursor::new(timestamp_key(&at(10)), Some("u-10".to_string())));
        assert_eq!(pages[2].next_cursor, None);

        // No widened re-query for distinct values.
        assert_eq!(store.queries(), 3);
    }

    #[tokio::test]
    async fn test_exact_page_size_returns_everything() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(5));

        let page = engine
            .fetch_page::<Upload>(store.source(), &request(None, 5))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn test_one_past_page_size() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(6));

        let pages = fetch_all(&engine, &store, 5).await;

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items.len(), 5);
        let cursor = Cursor::decode(pages[0].next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(cursor.id.as_deref(), Some("u-05"));
        assert_eq!(ids(&pages[1]), vec!["u-06"]);
        assert_eq!(pages[1].next_cursor, None);
    }

    #[tokio::test]
    async fn test_tie_group_larger_than_page() {
        // u-07 .. u-01 share one timestamp and are stored in reverse id order.
        let mut rows: Vec<Upload> = (1..=7)
            .rev()
            .map(|n| upload(&format!("u-{n:02}"), 1))
            .collect();
        rows.extend((8..=10).map(|n| upload(&format!("u-{n:02}"), n)));
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(rows);

        let pages = fetch_all(&engine, &store, 5).await;

        assert!(pages.iter().all(|page| page.items.len() <= 5));
        let all: Vec<String> = pages.iter().flat_map(ids).collect();
        let expected: Vec<String> = (1..=10).map(|n| format!("u-{n:02}")).collect();
        assert_eq!(all, expected);
        // Each page needed the widened re-query.
        assert_eq!(pages.len(), 2);
        assert_eq!(store.queries(), 4);
    }

    #[tokio::test]
    async fn test_chaining_yields_every_item_once() {
        let mut rows = distinct_uploads(23);
        rows.extend((24..=30).map(|n| upload(&format!("u-{n:02}"), 12)));
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(rows);

        for page_size in [1, 3, 5, 7, 50] {
            let pages = fetch_all(&engine, &store, page_size).await;
            let mut all: Vec<String> = pages.iter().flat_map(ids).collect();
            assert!(pages.iter().all(|page| page.items.len() <= page_size));
            assert_eq!(all.len(), 30, "page size {page_size}");
            all.sort();
            all.dedup();
            assert_eq!(all.len(), 30, "page size {page_size}");
        }
    }

    #[tokio::test]
    async fn test_missing_base_record_does_not_end_pagination() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(12));
        let stale = StaleHydrator {
            store: &store,
            missing: "u-03",
        };

        let mut pages = Vec::new();
        let mut cursor = None;
        loop {
            let source = PageSource::SecondaryIndex {
                index: &store,
                hydrator: &stale,
            };
            let page = engine
                .fetch_page::<Upload>(source, &request(cursor, 5))
                .await
                .unwrap();
            cursor = page.next_cursor.clone();
            pages.push(page);
            if cursor.is_none() {
                break;
            }
        }

        assert_eq!(pages.len(), 3);
        assert_eq!(ids(&pages[0]), vec!["u-01", "u-02", "u-04", "u-05"]);
        let first = Cursor::decode(pages[0].next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(first, Cursor::new(timestamp_key(&at(5)), Some("u-05".to_string())));
        assert_eq!(ids(&pages[1]), vec!["u-06", "u-07", "u-08", "u-09", "u-10"]);
        assert_eq!(ids(&pages[2]), vec!["u-11", "u-12"]);
    }

    #[tokio::test]
    async fn test_cursor_beyond_first_window_found_on_retry() {
        // u-08 .. u-01 share one timestamp and are stored in reverse id order,
        // so the first window of five holds u-08 .. u-04 but not u-03.
        let rows: Vec<Upload> = (1..=8)
            .rev()
            .map(|n| upload(&format!("u-{n:02}"), 1))
            .collect();
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(rows);
        let cursor = Cursor::new(timestamp_key(&at(1)), Some("u-03".to_string())).encode();

        let page = engine
            .fetch_page::<Upload>(store.source(), &request(Some(cursor), 3))
            .await
            .unwrap();

        assert_eq!(store.queries(), 2);
        assert_eq!(ids(&page), vec!["u-04", "u-05", "u-06"]);
        let next = Cursor::decode(page.next_cursor.as_deref().unwrap()).unwrap();
        assert_eq!(next, Cursor::new(timestamp_key(&at(1)), Some("u-06".to_string())));
    }

    #[tokio::test]
    async fn test_cursor_outside_range_is_invalid() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(3));

        for value in [timestamp_key(&at(-1)), timestamp_key(&at(1_000))] {
            let cursor = Cursor::new(value.clone(), Some("u-01".to_string())).encode();
            let result = engine
                .fetch_page::<Upload>(store.source(), &request(Some(cursor), 5))
                .await;
            assert_eq!(result, Err(PagingError::InvalidCursor(value)));
        }
        assert_eq!(store.queries(), 0);
    }

    #[tokio::test]
    async fn test_direct_cursor_outside_range_is_invalid() {
        let engine = PaginationEngine::default();
        let table = activities(5);
        let cursor = Cursor::new(timestamp_key(&at(2_000)), None).encode();

        let result = engine
            .fetch_page::<ScheduledActivity>(
                PageSource::Direct(&table),
                &direct_request(Some(cursor), 5),
            )
            .await;

        assert_eq!(
            result,
            Err(PagingError::InvalidCursor(timestamp_key(&at(2_000))))
        );
    }

    #[tokio::test]
    async fn test_unknown_cursor_is_invalid() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(12));
        let cursor = Cursor::new(timestamp_key(&at(5)), Some("u-99".to_string())).encode();

        let result = engine
            .fetch_page::<Upload>(store.source(), &request(Some(cursor), 5))
            .await;

        assert_eq!(
            result,
            Err(PagingError::InvalidCursor(timestamp_key(&at(5))))
        );
        assert_eq!(store.queries(), 2);
    }

    #[tokio::test]
    async fn test_cursor_past_last_item_is_empty_page() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(3));
        let cursor = Cursor::new(timestamp_key(&at(3)), Some("u-03".to_string())).encode();

        let page = engine
            .fetch_page::<Upload>(store.source(), &request(Some(cursor), 5))
            .await
            .unwrap();

        assert_eq!(page, Page::empty());
    }

    #[tokio::test]
    async fn test_malformed_cursor_is_bad_request() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(3));

        let result = engine
            .fetch_page::<Upload>(store.source(), &request(Some("%%%".to_string()), 5))
            .await;

        assert!(matches!(result, Err(PagingError::BadRequest(_))));
        assert_eq!(store.queries(), 0);
    }

    #[tokio::test]
    async fn test_index_cursor_without_id_is_bad_request() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(3));
        let cursor = Cursor::new(timestamp_key(&at(1)), None).encode();

        let result = engine
            .fetch_page::<Upload>(store.source(), &request(Some(cursor), 5))
            .await;

        assert!(matches!(result, Err(PagingError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_page_size_bounds() {
        let engine = PaginationEngine::new(PagingLimits {
            max_page_size: 100,
            widen_by: 100,
        });
        let store = FakeUploads::new(distinct_uploads(3));

        for page_size in [0, 101] {
            let result = engine
                .fetch_page::<Upload>(store.source(), &request(None, page_size))
                .await;
            assert_eq!(
                result,
                Err(PagingError::BadRequest(
                    "pageSize must be from 1-100 records".to_string()
                ))
            );
        }

        let page = engine
            .fetch_page::<Upload>(store.source(), &request(None, 100))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
    }

    #[tokio::test]
    async fn test_wrong_kind_from_hydrator() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(distinct_uploads(3));
        let source = PageSource::SecondaryIndex {
            index: &store,
            hydrator: &WrongKindHydrator,
        };

        let result = engine.fetch_page::<Upload>(source, &request(None, 5)).await;

        assert_eq!(
            result,
            Err(PagingError::HydrationInconsistency {
                expected: RecordKind::Upload,
                found: RecordKind::ScheduledActivity,
            })
        );
    }

    #[tokio::test]
    async fn test_identical_calls_return_identical_pages() {
        let mut rows: Vec<Upload> = (1..=4)
            .rev()
            .map(|n| upload(&format!("u-{n:02}"), 2))
            .collect();
        rows.push(upload("u-00", 1));
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(rows);

        let first = engine
            .fetch_page::<Upload>(store.source(), &request(None, 3))
            .await
            .unwrap();
        let second = engine
            .fetch_page::<Upload>(store.source(), &request(None, 3))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!(first.has_next());
    }

    #[tokio::test]
    async fn test_empty_partition() {
        let engine = PaginationEngine::default();
        let store = FakeUploads::new(Vec::new());

        let page = engine
            .fetch_page::<Upload>(store.source(), &request(None, 5))
            .await
            .unwrap();

        assert_eq!(page, Page::empty());
        assert_eq!(store.queries(), 1);
    }

    fn activities(count: i64) -> FakeActivities {
        let mut rows: Vec<ScheduledActivity> = (1..=count)
            .map(|n| {
                ScheduledActivity::new("hc-1", "activity-1", "referent-1", ActivityType::Task, at(n))
            })
            .collect();
        rows.push(ScheduledActivity::new(
            "hc-1",
            "activity-2",
            "referent-1",
            ActivityType::Task,
            at(3),
        ));
        FakeActivities { rows }
    }

    fn direct_request(cursor: Option<String>, page_size: usize) -> PageRequest {
        PageRequest {
            keys: KeyCodec::bucketed("activity-1"),
            ..request(cursor, page_size)
        }
    }

    #[tokio::test]
    async fn test_direct_pages_follow_continuation_key() {
        let engine = PaginationEngine::default();
        let table = activities(12);

        let mut guids = Vec::new();
        let mut cursors = Vec::new();
        let mut cursor = None;
        loop {
            let page = engine
                .fetch_page::<ScheduledActivity>(PageSource::Direct(&table), &direct_request(cursor, 5))
                .await
                .unwrap();
            assert!(page.items.len() <= 5);
            guids.extend(page.items.iter().map(|a| a.guid.clone()));
            cursor = page.next_cursor.clone();
            match &cursor {
                Some(token) => cursors.push(Cursor::decode(token).unwrap()),
                None => break,
            }
        }

        let expected: Vec<String> = (1..=12)
            .map(|n| activity_guid_key("activity-1", &at(n)))
            .collect();
        assert_eq!(guids, expected);
        assert_eq!(
            cursors,
            vec![
                Cursor::new(timestamp_key(&at(5)), None),
                Cursor::new(timestamp_key(&at(10)), None),
            ]
        );
    }

    #[tokio::test]
    async fn test_direct_exact_page_size() {
        let engine = PaginationEngine::default();
        let table = activities(5);

        let page = engine
            .fetch_page::<ScheduledActivity>(PageSource::Direct(&table), &direct_request(None, 5))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.next_cursor, None);
    }
}
