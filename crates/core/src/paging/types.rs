use serde::{Deserialize, Serialize};

use crate::records::StoredRecord;

use super::cursor::KeyCodec;

/// Default ceiling on the number of items in one page.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Half-open `[start, end)` range over the value component of a sort or
/// index key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRange {
    pub start: String,
    pub end: String,
}

impl SortRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Canonical position of a record: full sort/index value, then a stable
/// unique identifier to break ties.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub value: String,
    pub id: String,
}

impl Position {
    pub fn new(value: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            id: id.into(),
        }
    }
}

/// Primary key of a stored record. Hash-only tables have no sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub partition: String,
    pub sort: Option<String>,
}

impl PrimaryKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: Some(sort.into()),
        }
    }

    pub fn hash_only(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: None,
        }
    }
}

/// Partial projection of a record as stored by a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Index partition value.
    pub partition: String,
    /// Full index sort value.
    pub index_value: String,
    /// Tie-break identifier.
    pub id: String,
    /// Key of the full record in the base table.
    pub key: PrimaryKey,
}

impl IndexEntry {
    pub fn position(&self) -> Position {
        Position::new(self.index_value.clone(), self.id.clone())
    }
}

/// Index entries returned by one index query, in the store's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexWindow {
    pub entries: Vec<IndexEntry>,
    /// True when nothing in range lies beyond the returned entries.
    pub exhausted: bool,
}

/// Records returned by one direct range query.
#[derive(Debug, Clone, Default)]
pub struct RangeSlice {
    pub items: Vec<StoredRecord>,
    /// Full sort key of the last evaluated row when more rows may follow.
    pub last_evaluated: Option<String>,
}

/// Consistency requested for a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadConsistency {
    #[default]
    Eventual,
    Strong,
}

/// Bounds applied by the pagination engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingLimits {
    pub max_page_size: usize,
    /// Extra entries requested by the widened index re-query.
    pub widen_by: usize,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            widen_by: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// One `fetch_page` call: which partition, which slice of it, where to
/// resume, and how many items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub partition: String,
    pub range: SortRange,
    pub keys: KeyCodec,
    pub cursor: Option<String>,
    pub page_size: usize,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
