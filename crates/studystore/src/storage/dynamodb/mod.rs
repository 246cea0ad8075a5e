//! DynamoDB storage backend implementation.
//!
//! One [`DynamoTable`] per record table serves range queries, keys-only
//! index queries and batch hydration to the paging engine.

mod conversions;
mod error;
mod keys;
mod repository;
mod table;

pub use repository::DynamoDbRepository;
pub use table::DynamoTable;
