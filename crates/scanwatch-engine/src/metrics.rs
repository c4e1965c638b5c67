//! Metrics collected while walking pages

use std::time::Duration;

/// Counters for one walk
///
/// Tracks pages fetched, records processed and records whose processing
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkMetrics {
    /// Pages fetched, empty ones included
    pub pages: usize,

    /// Pages that came back empty
    pub empty_pages: usize,

    /// Records handed to the processor
    pub records: usize,

    /// Records whose processing failed
    pub records_failed: usize,

    /// Wall-clock time spent in the walk
    pub elapsed: Duration,
}

impl WalkMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page of `len` records
    pub fn record_page(&mut self, len: usize) {
        self.pages += 1;
        if len == 0 {
            self.empty_pages += 1;
        }
        self.records += len;
    }

    /// Record a failed record
    pub fn record_failure(&mut self) {
        self.records_failed += 1;
    }

    /// Records processed without error
    pub fn records_succeeded(&self) -> usize {
        self.records - self.records_failed
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let lines = [
            "Walk Metrics Summary".to_string(),
            "====================".to_string(),
            format!("Pages: {} ({} empty)", self.pages, self.empty_pages),
            format!("Records: {}", self.records),
            format!("Succeeded: {}", self.records_succeeded()),
            format!("Failed: {}", self.records_failed),
            format!("Elapsed: {:.1}s", self.elapsed.as_secs_f64()),
        ];
        lines.join("\n")
    }
}
