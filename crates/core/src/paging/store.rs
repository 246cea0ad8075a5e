//! Store operations the pagination engine consumes.

use async_trait::async_trait;

use crate::records::StoredRecord;
use crate::storage::Result;

use super::planner::QuerySpec;
use super::types::{IndexWindow, PrimaryKey, RangeSlice};

/// Ascending range query over a base table's key space.
#[async_trait]
pub trait RangeQuery: Send + Sync {
    /// Returns up to `spec.limit` records and the store's continuation key.
    async fn query_range(&self, spec: &QuerySpec) -> Result<RangeSlice>;
}

/// Ascending range query over a partial-projection secondary index.
#[async_trait]
pub trait IndexQuery: Send + Sync {
    /// Returns up to `spec.limit` index entries in the index's own order.
    async fn query_index(&self, spec: &QuerySpec) -> Result<IndexWindow>;
}

/// Batch loads full records by primary key.
#[async_trait]
pub trait Hydrator: Send + Sync {
    /// Loads the records for `keys` in any order. Keys without a record are
    /// skipped; a failed batch is an error.
    async fn hydrate(&self, keys: &[PrimaryKey]) -> Result<Vec<StoredRecord>>;
}

/// Where a page is read from.
#[derive(Clone, Copy)]
pub enum PageSource<'a> {
    Direct(&'a dyn RangeQuery),
    SecondaryIndex {
        index: &'a dyn IndexQuery,
        hydrator: &'a dyn Hydrator,
    },
}
