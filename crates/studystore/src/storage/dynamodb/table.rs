//! One DynamoDB table with an optional keys-only secondary index.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes};
use aws_sdk_dynamodb::Client;

use studystore_core::paging::{
    Hydrator, IndexQuery, IndexWindow, PrimaryKey, QuerySpec, RangeQuery, RangeSlice,
    ReadConsistency,
};
use studystore_core::records::{StoredRecord, TableSchema};
use studystore_core::storage::{RepositoryError, Result};

use super::conversions::{item_to_index_entry, item_to_record, record_to_item, Item};
use super::error::{
    map_batch_get_error, map_put_item_error, map_query_error, unprocessed_keys_error,
};
use super::keys::{self, PARTITION_NAME, SORT_NAME};

/// Maximum keys per BatchGetItem request.
const BATCH_GET_LIMIT: usize = 100;

/// Access to one record kind's table.
#[derive(Debug, Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
    schema: &'static TableSchema,
}

impl DynamoTable {
    pub fn new(
        client: Client,
        table_name: impl Into<String>,
        schema: &'static TableSchema,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            schema,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Writes a record, replacing any item with the same primary key.
    pub async fn put(&self, record: &StoredRecord) -> Result<()> {
        if record.kind() != self.schema.kind {
            return Err(RepositoryError::InvalidData(format!(
                "cannot store {} in the {} table",
                record.kind(),
                self.schema.kind
            )));
        }

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)?))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    /// Runs a `BETWEEN` query and drops items equal to the exclusive upper
    /// bound. The flag is set when an item was dropped.
    async fn query_between(
        &self,
        spec: &QuerySpec,
        sort_attr: &str,
        index_name: Option<&str>,
    ) -> Result<(Vec<Item>, Option<Item>, bool)> {
        let exclusive_start = spec.exclusive_start.as_ref().map(|sort| {
            keys::key_to_item(
                self.schema,
                &PrimaryKey::new(spec.partition.clone(), sort.clone()),
            )
        });

        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .set_index_name(index_name.map(str::to_string))
            .key_condition_expression(keys::range_condition())
            .expression_attribute_names(PARTITION_NAME, self.partition_attr(index_name.is_some()))
            .expression_attribute_names(SORT_NAME, sort_attr)
            .expression_attribute_values(":pk", AttributeValue::S(spec.partition.clone()))
            .expression_attribute_values(":lower", AttributeValue::S(spec.lower.clone()))
            .expression_attribute_values(":upper", AttributeValue::S(spec.upper.clone()))
            .limit(query_limit(spec.limit))
            .set_exclusive_start_key(exclusive_start)
            .consistent_read(spec.consistency == ReadConsistency::Strong)
            .send()
            .await
            .map_err(map_query_error)?;

        let mut items = result.items.unwrap_or_default();
        let before = items.len();
        items.retain(|item| {
            keys::key_string(item, sort_attr).as_deref() != Some(spec.upper.as_str())
        });
        let reached_upper = items.len() < before;

        Ok((items, result.last_evaluated_key, reached_upper))
    }

    fn partition_attr(&self, on_index: bool) -> &'static str {
        match (&self.schema.index, on_index) {
            (Some(index), true) => index.partition_attr,
            _ => self.schema.partition_attr,
        }
    }
}

fn query_limit(limit: usize) -> i32 {
    i32::try_from(limit).unwrap_or(i32::MAX)
}

/// Keeps at most `limit` items. A surplus item means the last kept item is
/// where the next page resumes.
fn cut_range_page(
    mut items: Vec<Item>,
    limit: usize,
    sort_attr: &str,
    continuation: Option<String>,
) -> (Vec<Item>, Option<String>) {
    if items.len() <= limit {
        return (items, continuation);
    }
    items.truncate(limit);
    let resume = items.last().and_then(|item| keys::key_string(item, sort_attr));
    (items, resume)
}

#[async_trait]
impl RangeQuery for DynamoTable {
    async fn query_range(&self, spec: &QuerySpec) -> Result<RangeSlice> {
        let Some(sort_attr) = self.schema.sort_attr else {
            return Err(RepositoryError::QueryFailed(format!(
                "{} table has no sort key",
                self.schema.kind
            )));
        };

        // One extra item tells a full last page apart from a page with more after it.
        let lookahead = QuerySpec {
            limit: spec.limit + 1,
            ..spec.clone()
        };
        let (items, last_evaluated_key, reached_upper) =
            self.query_between(&lookahead, sort_attr, None).await?;

        let continuation = if reached_upper {
            None
        } else {
            last_evaluated_key.and_then(|key| keys::key_string(&key, sort_attr))
        };
        let (items, last_evaluated) = cut_range_page(items, spec.limit, sort_attr, continuation);

        tracing::debug!(
            table = %self.table_name,
            count = items.len(),
            has_more = last_evaluated.is_some(),
            "Range query"
        );

        let items = items.iter().map(item_to_record).collect::<Result<Vec<_>>>()?;
        Ok(RangeSlice {
            items,
            last_evaluated,
        })
    }
}

#[async_trait]
impl IndexQuery for DynamoTable {
    async fn query_index(&self, spec: &QuerySpec) -> Result<IndexWindow> {
        let Some(index) = &self.schema.index else {
            return Err(RepositoryError::QueryFailed(format!(
                "{} table has no secondary index",
                self.schema.kind
            )));
        };

        // Global secondary indexes only support eventually consistent reads.
        let spec = QuerySpec {
            consistency: ReadConsistency::Eventual,
            exclusive_start: None,
            ..spec.clone()
        };
        let (items, last_evaluated_key, reached_upper) = self
            .query_between(&spec, index.value_attr, Some(index.name))
            .await?;

        let exhausted = reached_upper || last_evaluated_key.is_none();
        let entries = items
            .iter()
            .map(|item| item_to_index_entry(self.schema, item))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            table = %self.table_name,
            index = index.name,
            count = entries.len(),
            exhausted,
            "Index query"
        );

        Ok(IndexWindow { entries, exhausted })
    }
}

#[async_trait]
impl Hydrator for DynamoTable {
    async fn hydrate(&self, primary_keys: &[PrimaryKey]) -> Result<Vec<StoredRecord>> {
        let mut records = Vec::with_capacity(primary_keys.len());

        for chunk in primary_keys.chunks(BATCH_GET_LIMIT) {
            let request = KeysAndAttributes::builder()
                .set_keys(Some(
                    chunk
                        .iter()
                        .map(|key| keys::key_to_item(self.schema, key))
                        .collect(),
                ))
                .build()
                .map_err(|e| {
                    RepositoryError::QueryFailed(format!("Invalid batch request: {}", e))
                })?;

            let result = self
                .client
                .batch_get_item()
                .request_items(&self.table_name, request)
                .send()
                .await
                .map_err(map_batch_get_error)?;

            let unprocessed = result
                .unprocessed_keys
                .as_ref()
                .and_then(|tables| tables.get(&self.table_name))
                .map_or(0, |pending| pending.keys().len());
            if unprocessed > 0 {
                return Err(unprocessed_keys_error(&self.table_name, unprocessed));
            }

            let items = result
                .responses
                .unwrap_or_default()
                .remove(&self.table_name)
                .unwrap_or_default();
            for item in &items {
                records.push(item_to_record(item)?);
            }
        }

        Ok(records)
    }
}
