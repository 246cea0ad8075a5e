//! Forward-cursor pagination over hash/range keyed tables and their
//! partial-projection secondary indexes.
//!
//! The planner, resolver and assembler are pure functions; the engine
//! drives them against the store operations declared in [`store`].

mod assembler;
mod cursor;
mod engine;
mod error;
mod planner;
mod resolver;
pub mod store;
mod types;

pub use assembler::{assemble, PagedRecord};
pub use cursor::{Cursor, CursorError, KeyCodec, KEY_SEPARATOR, MAX_CURSOR_LEN};
pub use engine::PaginationEngine;
pub use error::{PagingError, Result};
pub use planner::{plan, widen, QuerySpec, Strategy};
pub use resolver::{resolve, sort_window, Resolution};
pub use store::{Hydrator, IndexQuery, PageSource, RangeQuery};
pub use types::{
    IndexEntry, IndexWindow, Page, PageRequest, PagingLimits, Position, PrimaryKey,
    RangeSlice, ReadConsistency, SortRange, DEFAULT_MAX_PAGE_SIZE,
};
