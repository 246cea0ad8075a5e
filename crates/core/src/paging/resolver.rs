//! Locating the previous page's end inside an over-fetched index window.

use super::types::{IndexEntry, Position};

/// Where the next page starts inside a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Index of the first entry of the page.
    pub start_index: usize,
    /// Whether the cursor entry was located (always true without a cursor).
    pub cursor_found: bool,
    /// Whether the window may be cut short and should be read again wider.
    pub needs_retry: bool,
}

/// Sorts index entries into canonical order.
pub fn sort_window(entries: &mut [IndexEntry]) {
    entries.sort_by(|a, b| {
        a.index_value
            .cmp(&b.index_value)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Resolves the start of the page in a canonically sorted window.
///
/// A retry is needed when the cursor is missing, or when the window was
/// cut by the query limit and either fewer than `page_size + 1` entries
/// follow the start or the page would end inside the window's trailing
/// tie group, whose members beyond the limit are unknown.
pub fn resolve(
    window: &[IndexEntry],
    exhausted: bool,
    cursor: Option<&Position>,
    page_size: usize,
) -> Resolution {
    let (start_index, cursor_found) = match cursor {
        None => (0, true),
        Some(cursor) => match window
            .iter()
            .position(|entry| entry.index_value == cursor.value && entry.id == cursor.id)
        {
            Some(found) => (found + 1, true),
            None => (0, false),
        },
    };

    if !cursor_found {
        return Resolution {
            start_index,
            cursor_found,
            needs_retry: true,
        };
    }

    let needs_retry = !exhausted
        && (window.len() <= start_index + page_size
            || ends_in_trailing_ties(window, start_index, page_size));

    Resolution {
        start_index,
        cursor_found,
        needs_retry,
    }
}

fn ends_in_trailing_ties(window: &[IndexEntry], start_index: usize, page_size: usize) -> bool {
    let page_end = (start_index + page_size).min(window.len());
    match (page_end.checked_sub(1).and_then(|i| window.get(i)), window.last()) {
        (Some(last_item), Some(trailing)) => last_item.index_value == trailing.index_value,
        _ => false,
    }
}
