//! Configuration for walks and instability detection
//!
//! Both types deserialize from TOML tables; missing keys take their defaults:
//!
//! ```toml
//! [walker]
//! reverse = false
//! max_records = 100
//! max_wait_secs = 3
//! lookback_minutes = 15
//!
//! [detector]
//! resolve_cases = true
//! baseline_days = 7
//! recent_days = 1
//! ```

use crate::error::ConfigError;
use chrono::{DateTime, Duration, FixedOffset};
use scanwatch_domain::{
    PageCursor, PageLimits, QueryDirection, TimeWindow, DEFAULT_MAX_RECORDS, DEFAULT_MAX_WAIT_SECS,
};
use serde::{Deserialize, Serialize};

/// Configuration for a paginating walk
///
/// # Examples
///
/// ```
/// use scanwatch_engine::WalkerConfig;
///
/// // Forward tail starting 15 minutes back
/// let config = WalkerConfig::default();
/// assert!(!config.reverse);
/// assert_eq!(config.lookback_minutes, 15);
///
/// // Most recent page only
/// let config = WalkerConfig::snapshot();
/// assert!(config.reverse);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Walk most-recent-first and stop after one page
    pub reverse: bool,

    /// Maximum records per page
    pub max_records: u32,

    /// Maximum seconds the server may wait for new records
    pub max_wait_secs: u32,

    /// How far back a forward walk starts, in minutes
    pub lookback_minutes: u32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            reverse: false,
            max_records: DEFAULT_MAX_RECORDS,
            max_wait_secs: DEFAULT_MAX_WAIT_SECS,
            lookback_minutes: 15,
        }
    }
}

impl WalkerConfig {
    /// Single backward page of the most recent records
    pub fn snapshot() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }

    /// Query direction
    pub fn direction(&self) -> QueryDirection {
        QueryDirection::from_reverse(self.reverse)
    }

    /// Per-query limits
    pub fn limits(&self) -> PageLimits {
        PageLimits {
            max_records: self.max_records,
            max_wait_secs: self.max_wait_secs,
        }
    }

    /// Initial cursor for a walk starting at `now`
    ///
    /// Backward walks start at `now`; forward walks start `lookback_minutes`
    /// earlier.
    pub fn start_cursor(&self, now: DateTime<FixedOffset>) -> PageCursor {
        match self.direction() {
            QueryDirection::Backward => PageCursor::SinceInstant(now),
            QueryDirection::Forward => {
                PageCursor::SinceInstant(now - Duration::minutes(i64::from(self.lookback_minutes)))
            }
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == 0 {
            return Err(ConfigError::Invalid(
                "walker.max_records must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Longest baseline or recent window, in days
pub const MAX_WINDOW_DAYS: u32 = 3650;

/// Configuration for the instability detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Resolve the unstable test cases of each reported container
    pub resolve_cases: bool,

    /// Length of the baseline window in days
    pub baseline_days: u32,

    /// Length of the recent window in days
    pub recent_days: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            resolve_cases: true,
            baseline_days: 7,
            recent_days: 1,
        }
    }
}

impl DetectorConfig {
    /// Adjacent baseline and recent windows ending at `now`
    ///
    /// recent = [now - recent_days, now), baseline = the `baseline_days`
    /// before that.
    pub fn windows(
        &self,
        now: DateTime<FixedOffset>,
    ) -> Result<(TimeWindow, TimeWindow), ConfigError> {
        let recent_start = days_before(now, self.recent_days)?;
        let baseline_start = days_before(recent_start, self.baseline_days)?;

        let baseline = TimeWindow::new(baseline_start, recent_start)?;
        let recent = TimeWindow::new(recent_start, now)?;
        Ok((baseline, recent))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baseline_days == 0 || self.recent_days == 0 {
            return Err(ConfigError::Invalid(
                "detector windows must be at least one day long".to_string(),
            ));
        }
        if self.baseline_days > MAX_WINDOW_DAYS || self.recent_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::Invalid(format!(
                "detector windows must be at most {} days long",
                MAX_WINDOW_DAYS
            )));
        }
        Ok(())
    }
}

fn days_before(
    at: DateTime<FixedOffset>,
    days: u32,
) -> Result<DateTime<FixedOffset>, ConfigError> {
    at.checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| {
            ConfigError::Invalid(format!("{} days before {} is out of range", days, at))
        })
}

/// Default windows: baseline = [now-8d, now-1d), recent = [now-1d, now)
pub fn default_windows(now: DateTime<FixedOffset>) -> (TimeWindow, TimeWindow) {
    let recent_start = now - Duration::days(1);
    let baseline = TimeWindow {
        start: now - Duration::days(8),
        end: recent_start,
    };
    let recent = TimeWindow {
        start: recent_start,
        end: now,
    };
    (baseline, recent)
}
