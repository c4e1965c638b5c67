//! Cursor module - resumable positions in the build stream

use crate::record::{Record, RecordId};
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Default maximum number of records returned by a single page query
pub const DEFAULT_MAX_RECORDS: u32 = 100;

/// Default number of seconds the server may wait to fill a page
pub const DEFAULT_MAX_WAIT_SECS: u32 = 3;

/// Position in the ordered record stream
///
/// A cursor starts as [`PageCursor::SinceInstant`] and becomes
/// [`PageCursor::SinceRecord`] as soon as any page yields a record. It is a
/// plain value: advancing it returns a new cursor and never mutates the old
/// one, so any cursor handed out by a walk can be stored and replayed later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageCursor {
    /// Records that became available at or after the given instant
    SinceInstant(DateTime<FixedOffset>),

    /// Records strictly after the given record
    SinceRecord(RecordId),
}

impl PageCursor {
    /// Compute the cursor for the next query after receiving `page`
    ///
    /// A non-empty page moves the cursor to the ID of its last record (in
    /// return order). An empty page leaves the cursor unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use scanwatch_domain::{PageCursor, RecordId};
    ///
    /// let cursor = PageCursor::SinceRecord(RecordId::new("a"));
    /// assert_eq!(cursor.advance(&[]), cursor);
    /// ```
    pub fn advance(&self, page: &[Record]) -> PageCursor {
        match page.last() {
            Some(last) => PageCursor::SinceRecord(last.id.clone()),
            None => self.clone(),
        }
    }

    /// The record this cursor points after, if any record has been seen
    pub fn last_record(&self) -> Option<&RecordId> {
        match self {
            PageCursor::SinceRecord(id) => Some(id),
            PageCursor::SinceInstant(_) => None,
        }
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageCursor::SinceInstant(at) => write!(f, "since {}", at.to_rfc3339()),
            PageCursor::SinceRecord(id) => write!(f, "after {}", id),
        }
    }
}

/// Time direction of a page query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueryDirection {
    /// Oldest first; the walk tails the stream indefinitely
    #[default]
    Forward,

    /// Most recent first; the walk performs exactly one query
    Backward,
}

impl QueryDirection {
    /// Whether the query is reversed (most recent first)
    pub fn is_reverse(&self) -> bool {
        matches!(self, QueryDirection::Backward)
    }

    /// Direction from the `reverse` flag used on the wire
    pub fn from_reverse(reverse: bool) -> Self {
        if reverse {
            QueryDirection::Backward
        } else {
            QueryDirection::Forward
        }
    }
}

/// Advisory caps on a single page query
///
/// The source may return fewer records, and sooner, than these limits allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Maximum number of records in one page
    pub max_records: u32,

    /// Maximum number of seconds the server waits before answering
    pub max_wait_secs: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_records: DEFAULT_MAX_RECORDS,
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
        }
    }
}

/// A fully specified page query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    /// Time direction
    pub direction: QueryDirection,

    /// Where the page starts
    pub cursor: PageCursor,

    /// Size and wait caps
    pub limits: PageLimits,
}

impl PageQuery {
    /// Create a page query
    pub fn new(direction: QueryDirection, cursor: PageCursor, limits: PageLimits) -> Self {
        Self {
            direction,
            cursor,
            limits,
        }
    }
}
