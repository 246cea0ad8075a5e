use super::cursor::KeyCodec;
use super::error::Result;
use super::types::{Page, Position};
use crate::storage::RepositoryError;

/// A record with a canonical position in an index.
pub trait PagedRecord {
    fn position(&self) -> Position;
}

/// Sorts hydrated records into canonical order and cuts the page.
///
/// `boundary` is the index position of the last entry on this page when
/// the index holds more entries after it. The cursor always names the
/// boundary, so a record that failed to hydrate never shortens the chain.
/// Without a boundary, more than `page_size` records still produce a cursor
/// to the last kept record; otherwise this is the last page.
pub fn assemble<R: PagedRecord>(
    mut records: Vec<R>,
    page_size: usize,
    boundary: Option<&Position>,
    keys: &KeyCodec,
) -> Result<Page<R>> {
    records.sort_by_cached_key(|record| record.position());

    let boundary = match boundary {
        Some(position) => Some(position.clone()),
        None if records.len() > page_size => page_size
            .checked_sub(1)
            .and_then(|last| records.get(last))
            .map(|record| record.position()),
        None => None,
    };

    let Some(boundary) = boundary else {
        return Ok(Page {
            items: records,
            next_cursor: None,
        });
    };

    records.retain(|record| record.position() <= boundary);
    records.truncate(page_size);
    let cursor = keys.cursor_for(&boundary).ok_or_else(|| {
        RepositoryError::InvalidData(format!(
            "index value {} is outside the queried bucket",
            boundary.value
        ))
    })?;

    Ok(Page {
        items: records,
        next_cursor: Some(cursor.encode()),
    })
}
