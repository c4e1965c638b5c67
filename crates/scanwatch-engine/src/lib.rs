//! Scanwatch Engine
//!
//! Walks the build stream page by page and analyses test outcomes.
//!
//! # Overview
//!
//! - **Paginating walk**: [`PaginatingWalker`] queries a page source with a
//!   [`PageCursor`](scanwatch_domain::PageCursor), hands every record to a
//!   [`RecordProcessor`](scanwatch_domain::traits::RecordProcessor) and moves
//!   the cursor to the last record of each page. Forward walks tail the
//!   stream until cancelled; backward walks return the most recent page.
//! - **Instability detection**: [`WindowedInstabilityDetector`] reports test
//!   containers that became unstable in a recent window after being stable
//!   in the baseline window before it.
//! - **Cache performance**: [`CachePerformanceProcessor`] turns walked builds
//!   into [`BuildCacheReport`]s.
//!
//! # Resuming
//!
//! Every walk returns the cursor it stopped at, and a failed query reports the
//! last cursor it tried. Walking again from that cursor continues with the
//! next unseen record:
//!
//! ```no_run
//! use scanwatch_engine::{EngineError, PaginatingWalker, WalkerConfig};
//! # use scanwatch_domain::traits::{PageSource, RecordProcessor};
//! # async fn example<S: PageSource, P: RecordProcessor>(source: S, mut processor: P) {
//! let config = WalkerConfig::default();
//! let walker = PaginatingWalker::new(source, &config);
//! let mut cursor = config.start_cursor(chrono::Local::now().fixed_offset());
//!
//! loop {
//!     match walker.walk(cursor.clone(), &mut processor).await {
//!         Ok(_) => break,
//!         Err(EngineError::Query { cursor: last, .. }) => cursor = last,
//!         Err(_) => break,
//!     }
//! }
//! # }
//! ```
//!
//! # Configuration
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
//! ```

#![warn(missing_docs)]

mod cache;
mod config;
mod detector;
mod error;
mod metrics;
mod walker;

pub use cache::{BuildCacheReport, CachePerformanceProcessor};
pub use config::{default_windows, DetectorConfig, WalkerConfig};
pub use detector::{filter_newly_unstable, UnstableContainer, WindowedInstabilityDetector};
pub use error::{ConfigError, EngineError};
pub use metrics::WalkMetrics;
pub use walker::{PaginatingWalker, WalkOutcome};
