//! One in-memory table with an optional secondary index.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use studystore_core::paging::{
    Hydrator, IndexEntry, IndexQuery, IndexWindow, PrimaryKey, QuerySpec, RangeQuery, RangeSlice,
};
use studystore_core::records::{
    decode_document, encode_document, Document, StoredRecord, TableSchema,
};
use studystore_core::storage::{RepositoryError, Result};

/// Rows of one record kind, kept in insertion order.
#[derive(Debug)]
pub struct MemoryTable {
    schema: &'static TableSchema,
    rows: Arc<RwLock<Vec<(PrimaryKey, Document)>>>,
}

impl MemoryTable {
    pub fn new(schema: &'static TableSchema) -> Self {
        Self {
            schema,
            rows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// The same rows read through another index of the table.
    pub fn index_view(&self, schema: &'static TableSchema) -> Self {
        Self {
            schema,
            rows: Arc::clone(&self.rows),
        }
    }

    /// Stores a record, replacing any row with the same primary key in place.
    pub async fn put(&self, record: &StoredRecord) -> Result<()> {
        if record.kind() != self.schema.kind {
            return Err(RepositoryError::InvalidData(format!(
                "cannot store {} in the {} table",
                record.kind(),
                self.schema.kind
            )));
        }

        let doc = encode_document(record)?;
        let key = self.schema.primary_key(&doc)?;

        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|(existing, _)| *existing == key) {
            Some(row) => row.1 = doc,
            None => rows.push((key, doc)),
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

fn in_bounds(value: &str, spec: &QuerySpec) -> bool {
    value >= spec.lower.as_str() && value < spec.upper.as_str()
}

#[async_trait]
impl RangeQuery for MemoryTable {
    async fn query_range(&self, spec: &QuerySpec) -> Result<RangeSlice> {
        if self.schema.sort_attr.is_none() {
            return Err(RepositoryError::QueryFailed(format!(
                "{} table has no sort key",
                self.schema.kind
            )));
        }

        let rows = self.rows.read().await;
        let mut matched: Vec<(&str, &Document)> = rows
            .iter()
            .filter(|(key, _)| key.partition == spec.partition)
            .filter_map(|(key, doc)| key.sort.as_deref().map(|sort| (sort, doc)))
            .filter(|(sort, _)| in_bounds(sort, spec))
            .filter(|(sort, _)| {
                spec.exclusive_start
                    .as_deref()
                    .is_none_or(|start| *sort > start)
            })
            .collect();
        matched.sort_by(|a, b| a.0.cmp(b.0));

        let has_more = matched.len() > spec.limit;
        matched.truncate(spec.limit);
        let last_evaluated = if has_more {
            matched.last().map(|(sort, _)| sort.to_string())
        } else {
            None
        };

        let items = matched
            .into_iter()
            .map(|(_, doc)| decode_document(doc.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(RangeSlice {
            items,
            last_evaluated,
        })
    }
}

#[async_trait]
impl IndexQuery for MemoryTable {
    async fn query_index(&self, spec: &QuerySpec) -> Result<IndexWindow> {
        if self.schema.index.is_none() {
            return Err(RepositoryError::QueryFailed(format!(
                "{} table has no secondary index",
                self.schema.kind
            )));
        }

        let rows = self.rows.read().await;
        let mut entries: Vec<IndexEntry> = Vec::new();
        for (_, doc) in rows.iter() {
            if let Some(entry) = self.schema.index_entry(doc)? {
                if entry.partition == spec.partition && in_bounds(&entry.index_value, spec) {
                    entries.push(entry);
                }
            }
        }
        // Stable: ties stay in insertion order.
        entries.sort_by(|a, b| a.index_value.cmp(&b.index_value));

        let exhausted = entries.len() < spec.limit;
        entries.truncate(spec.limit);
        Ok(IndexWindow { entries, exhausted })
    }
}

#[async_trait]
impl Hydrator for MemoryTable {
    async fn hydrate(&self, keys: &[PrimaryKey]) -> Result<Vec<StoredRecord>> {
        let rows = self.rows.read().await;
        keys.iter()
            .rev()
            .filter_map(|key| rows.iter().find(|(existing, _)| existing == key))
            .map(|(_, doc)| decode_document(doc.clone()))
            .collect()
    }
}
