//! Query planning for both paging strategies.
//!
//! Pure functions: a plan describes one range query against the store and
//! performs no I/O.

use super::cursor::{Cursor, KeyCodec};
use super::types::{ReadConsistency, SortRange};

/// How a page is read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Query the base table's key space, resuming from the store's own
    /// continuation key.
    Direct,
    /// Query a partial-projection secondary index, then hydrate.
    SecondaryIndex,
}

/// One ascending range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub partition: String,
    /// Inclusive lower bound on the full sort/index key.
    pub lower: String,
    /// Exclusive upper bound on the full sort/index key.
    pub upper: String,
    pub limit: usize,
    /// Full sort key to resume strictly after (direct strategy only).
    pub exclusive_start: Option<String>,
    pub consistency: ReadConsistency,
}

/// Builds the query for a page.
///
/// Direct pages request exactly `page_size` rows and resume after the
/// cursor's key. Index pages start at the cursor's value component,
/// request one extra entry as the next-page indicator, and one more when
/// resuming since the cursor entry itself is read again.
pub fn plan(
    strategy: Strategy,
    partition: &str,
    range: &SortRange,
    keys: &KeyCodec,
    cursor: Option<&Cursor>,
    page_size: usize,
) -> QuerySpec {
    let upper = keys.compose(&range.end);

    match strategy {
        Strategy::Direct => QuerySpec {
            partition: partition.to_string(),
            lower: keys.compose(&range.start),
            upper,
            limit: page_size,
            exclusive_start: cursor.map(|c| keys.compose(&c.value)),
            consistency: ReadConsistency::Strong,
        },
        Strategy::SecondaryIndex => {
            let lower = match cursor {
                Some(c) if c.value > range.start => keys.compose(&c.value),
                _ => keys.compose(&range.start),
            };
            let limit = match cursor {
                Some(_) => page_size + 2,
                None => page_size + 1,
            };
            QuerySpec {
                partition: partition.to_string(),
                lower,
                upper,
                limit,
                exclusive_start: None,
                consistency: ReadConsistency::Eventual,
            }
        }
    }
}

/// The same query with room for `widen_by` more entries.
pub fn widen(spec: &QuerySpec, widen_by: usize) -> QuerySpec {
    QuerySpec {
        limit: spec.limit + widen_by,
        ..spec.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> SortRange {
        SortRange::new("2024-01-01T00:00:00.000Z", "2024-02-01T00:00:00.000Z")
    }

    #[test]
    fn test_direct_plan_without_cursor() {
        let keys = KeyCodec::bucketed("activity-1");
        let spec = plan(Strategy::Direct, "hc-1", &range(), &keys, None, 5);

        assert_eq!(spec.partition, "hc-1");
        assert_eq!(spec.lower, "activity-1:2024-01-01T00:00:00.000Z");
        assert_eq!(spec.upper, "activity-1:2024-02-01T00:00:00.000Z");
        assert_eq!(spec.limit, 5);
        assert_eq!(spec.exclusive_start, None);
    }

    #[test]
    fn test_direct_plan_resumes_after_cursor() {
        let keys = KeyCodec::bucketed("activity-1");
        let cursor = Cursor::new("2024-01-10T08:00:00.000Z", None);
        let spec = plan(Strategy::Direct, "hc-1", &range(), &keys, Some(&cursor), 5);

        assert_eq!(spec.lower, "activity-1:2024-01-01T00:00:00.000Z");
        assert_eq!(
            spec.exclusive_start.as_deref(),
            Some("activity-1:2024-01-10T08:00:00.000Z")
        );
        assert_eq!(spec.limit, 5);
    }

    #[test]
    fn test_index_plan_requests_indicator() {
        let spec = plan(
            Strategy::SecondaryIndex,
            "hc-1",
            &range(),
            &KeyCodec::plain(),
            None,
            5,
        );

        assert_eq!(spec.lower, "2024-01-01T00:00:00.000Z");
        assert_eq!(spec.limit, 6);
        assert_eq!(spec.consistency, ReadConsistency::Eventual);
        assert_eq!(spec.exclusive_start, None);
    }

    #[test]
    fn test_index_plan_starts_at_cursor_value() {
        let keys = KeyCodec::bucketed("ref-1:survey");
        let cursor = Cursor::new("2024-01-10T08:00:00.000Z", Some("guid-3".into()));
        let spec = plan(
            Strategy::SecondaryIndex,
            "hc-1",
            &range(),
            &keys,
            Some(&cursor),
            5,
        );

        assert_eq!(spec.lower, "ref-1:survey:2024-01-10T08:00:00.000Z");
        assert_eq!(spec.upper, "ref-1:survey:2024-02-01T00:00:00.000Z");
        assert_eq!(spec.limit, 7);
    }

    #[test]
    fn test_index_plan_clamps_cursor_to_range_start() {
        let cursor = Cursor::new("2023-12-31T00:00:00.000Z", Some("guid-1".into()));
        let spec = plan(
            Strategy::SecondaryIndex,
            "hc-1",
            &range(),
            &KeyCodec::plain(),
            Some(&cursor),
            5,
        );

        assert_eq!(spec.lower, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_widen_adds_to_limit() {
        let spec = plan(
            Strategy::SecondaryIndex,
            "hc-1",
            &range(),
            &KeyCodec::plain(),
            None,
            5,
        );
        let widened = widen(&spec, 100);

        assert_eq!(widened.limit, 106);
        assert_eq!(widened.lower, spec.lower);
        assert_eq!(widened.upper, spec.upper);
    }
}
