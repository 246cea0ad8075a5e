//! In-memory storage backend.
//!
//! Each table keeps its rows as tagged documents in insertion order. Index
//! queries return ties in that physical order and batch reads return rows
//! in reverse request order, so the paging engine never relies on either.
//!
//! # Example
//!
//! ```rust,ignore
//! use studystore::storage::inmemory::InMemoryRepository;
//!
//! let repo = InMemoryRepository::new(PagingLimits::default());
//! repo.insert(upload).await?;
//! ```

mod repository;
mod table;

pub use repository::InMemoryRepository;
pub use table::MemoryTable;
