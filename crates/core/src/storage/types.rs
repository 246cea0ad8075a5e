use chrono::{DateTime, NaiveDate, Utc};

use crate::paging::SortRange;
use crate::serde::timestamp_key;

use super::RangeError;

/// A half-open `[start, end)` time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new time range, validating that start <= end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Range over timestamp keys.
    pub fn sort_range(&self) -> SortRange {
        SortRange::new(timestamp_key(&self.start), timestamp_key(&self.end))
    }
}

/// Longest report date range a single request may cover.
pub const MAX_REPORT_RANGE_DAYS: i64 = 45;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a date range spanning at most `max_days` days.
    pub fn bounded(start: NaiveDate, end: NaiveDate, max_days: i64) -> Result<Self, RangeError> {
        let range = Self::new(start, end)?;
        let days = (end - start).num_days();
        if days > max_days {
            return Err(RangeError::TooLong {
                days,
                max: max_days,
            });
        }
        Ok(range)
    }

    /// Range over `YYYY-MM-DD` keys, ending before the day after `end`.
    pub fn sort_range(&self) -> SortRange {
        let after_end = self
            .end
            .succ_opt()
            .map_or_else(|| format!("{}~", self.end), |day| day.to_string());
        SortRange::new(self.start.to_string(), after_end)
    }
}

/// Where to resume and how many items to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams {
    pub offset_key: Option<String>,
    pub page_size: usize,
}

impl PageParams {
    pub fn new(offset_key: Option<String>, page_size: usize) -> Self {
        Self {
            offset_key,
            page_size,
        }
    }

    pub fn first(page_size: usize) -> Self {
        Self::new(None, page_size)
    }
}
