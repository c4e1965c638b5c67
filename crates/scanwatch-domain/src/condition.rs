//! Condition module - the textual query predicate grammar
//!
//! Queries sent to the build-telemetry service are plain strings such as
//! `buildStartTime:[2023-10-24T09:15:30+02:00 to 2023-11-25T12:30:45+02:00] and project:app`.
//! [`Condition`] builds them from typed parts so that the same inputs always
//! render to the same bytes.

use crate::error::DomainError;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt;

/// Field holding the build start time
pub const BUILD_START_TIME: &str = "buildStartTime";

/// Field holding the project name
pub const PROJECT: &str = "project";

/// A query predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field:[start to end]`
    Between {
        /// Field name
        field: String,
        /// Inclusive start
        start: DateTime<FixedOffset>,
        /// Exclusive end
        end: DateTime<FixedOffset>,
    },

    /// `field>=start`
    Since {
        /// Field name
        field: String,
        /// Inclusive start
        start: DateTime<FixedOffset>,
    },

    /// `field:value`
    Equals {
        /// Field name
        field: String,
        /// Value, quoted on render when needed
        value: String,
    },

    /// Conjunction, rendered as `a and b and c`
    And(Vec<Condition>),
}

impl Condition {
    /// `field:[start to end]`
    pub fn between(
        field: impl Into<String>,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Self {
        Condition::Between {
            field: field.into(),
            start,
            end,
        }
    }

    /// `field>=start`
    pub fn since(field: impl Into<String>, start: DateTime<FixedOffset>) -> Self {
        Condition::Since {
            field: field.into(),
            start,
        }
    }

    /// `field:value`
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Condition::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Combine two conditions with `and`
    ///
    /// Nested conjunctions are flattened, so `a.and(b.and(c))` renders as
    /// `a and b and c`.
    pub fn and(self, other: Condition) -> Self {
        let mut parts = match self {
            Condition::And(parts) => parts,
            single => vec![single],
        };
        match other {
            Condition::And(more) => parts.extend(more),
            single => parts.push(single),
        }
        Condition::And(parts)
    }

    /// Builds started inside the window
    pub fn builds_between(window: &TimeWindow) -> Self {
        Self::between(BUILD_START_TIME, window.start, window.end)
    }

    /// Builds started at or after `start`
    pub fn builds_since(start: DateTime<FixedOffset>) -> Self {
        Self::since(BUILD_START_TIME, start)
    }

    /// Builds of the given project
    pub fn project_name_equals(name: impl Into<String>) -> Self {
        Self::equals(PROJECT, name)
    }

    /// Restrict to a project when one is given
    pub fn and_project(self, project: Option<&str>) -> Self {
        match project {
            Some(name) => self.and(Self::project_name_equals(name)),
            None => self,
        }
    }
}

/// Render a timestamp with second precision and an explicit `+HH:MM` offset
pub fn format_timestamp(at: &DateTime<FixedOffset>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    let needs_quotes = value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"');
    if !needs_quotes {
        return f.write_str(value);
    }
    f.write_str("\"")?;
    for c in value.chars() {
        if c == '"' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("\"")
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Between { field, start, end } => write!(
                f,
                "{}:[{} to {}]",
                field,
                format_timestamp(start),
                format_timestamp(end)
            ),
            Condition::Since { field, start } => {
                write!(f, "{}>={}", field, format_timestamp(start))
            }
            Condition::Equals { field, value } => {
                write!(f, "{}:", field)?;
                write_value(f, value)
            }
            Condition::And(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}

/// A half-open time window: start inclusive, end exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// Inclusive start
    pub start: DateTime<FixedOffset>,

    /// Exclusive end
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted ranges
    pub fn new(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::EmptyWindow {
                start: format_timestamp(&start),
                end: format_timestamp(&end),
            });
        }
        Ok(Self { start, end })
    }

    /// Whether this window ends at or before `later` starts
    pub fn precedes(&self, later: &TimeWindow) -> bool {
        self.end <= later.start
    }

    /// Whether `at` falls inside the window
    pub fn contains(&self, at: &DateTime<FixedOffset>) -> bool {
        self.start <= *at && *at < self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {}",
            format_timestamp(&self.start),
            format_timestamp(&self.end)
        )
    }
}
