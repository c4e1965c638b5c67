//! Paginating walk over a page source

use crate::config::WalkerConfig;
use crate::error::EngineError;
use crate::metrics::WalkMetrics;
use scanwatch_domain::traits::{PageSource, RecordProcessor};
use scanwatch_domain::{PageCursor, PageLimits, PageQuery, QueryDirection};
use std::future::Future;
use std::time::Instant;

/// Result of a walk that ended without a query failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Cursor to resume from
    pub cursor: PageCursor,

    /// Counters for the walk
    pub metrics: WalkMetrics,
}

/// Walks a page source one page at a time, handing every record to a
/// [`RecordProcessor`]
///
/// After a non-empty page the cursor moves to the last record of that page;
/// after an empty page it stays put. Backward walks stop after exactly one
/// query. Forward walks tail the source until cancelled.
///
/// # Examples
///
/// ```no_run
/// use scanwatch_engine::{PaginatingWalker, WalkerConfig};
/// # use scanwatch_domain::traits::{PageSource, RecordProcessor};
/// # async fn example<S: PageSource, P: RecordProcessor>(source: S, mut processor: P)
/// #     -> Result<(), Box<dyn std::error::Error>> {
/// let config = WalkerConfig::default();
/// let walker = PaginatingWalker::new(source, &config);
/// let cursor = config.start_cursor(chrono::Local::now().fixed_offset());
///
/// // Tail until Ctrl+C
/// let outcome = walker
///     .walk_until(cursor, &mut processor, async {
///         let _ = tokio::signal::ctrl_c().await;
///     })
///     .await?;
/// println!("{}", outcome.metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct PaginatingWalker<S> {
    source: S,
    direction: QueryDirection,
    limits: PageLimits,
}

impl<S: PageSource> PaginatingWalker<S> {
    /// Create a walker from configuration
    pub fn new(source: S, config: &WalkerConfig) -> Self {
        Self::with_limits(source, config.direction(), config.limits())
    }

    /// Create a walker with explicit direction and limits
    pub fn with_limits(source: S, direction: QueryDirection, limits: PageLimits) -> Self {
        Self {
            source,
            direction,
            limits,
        }
    }

    /// Direction of every query
    pub fn direction(&self) -> QueryDirection {
        self.direction
    }

    /// Underlying page source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Walk from `cursor`
    ///
    /// A backward walk returns after one page. A forward walk only returns on
    /// a query failure.
    pub async fn walk<P: RecordProcessor>(
        &self,
        cursor: PageCursor,
        processor: &mut P,
    ) -> Result<WalkOutcome, EngineError<S::Error>> {
        self.run(cursor, processor, None, std::future::pending()).await
    }

    /// Walk from `cursor` until `shutdown` completes
    ///
    /// Shutdown is only observed while waiting for a page, so a page that
    /// has been received is always processed in full and the returned cursor
    /// is consistent.
    pub async fn walk_until<P, F>(
        &self,
        cursor: PageCursor,
        processor: &mut P,
        shutdown: F,
    ) -> Result<WalkOutcome, EngineError<S::Error>>
    where
        P: RecordProcessor,
        F: Future<Output = ()>,
    {
        self.run(cursor, processor, None, shutdown).await
    }

    /// Walk at most `max_pages` pages from `cursor`
    ///
    /// The budget only bounds forward walks; a backward walk always issues
    /// its single query.
    pub async fn walk_pages<P: RecordProcessor>(
        &self,
        cursor: PageCursor,
        processor: &mut P,
        max_pages: usize,
    ) -> Result<WalkOutcome, EngineError<S::Error>> {
        self.run(cursor, processor, Some(max_pages), std::future::pending())
            .await
    }

    async fn run<P, F>(
        &self,
        mut cursor: PageCursor,
        processor: &mut P,
        max_pages: Option<usize>,
        shutdown: F,
    ) -> Result<WalkOutcome, EngineError<S::Error>>
    where
        P: RecordProcessor,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let started = Instant::now();
        let mut metrics = WalkMetrics::new();

        tracing::info!(
            direction = ?self.direction,
            cursor = %cursor,
            max_records = self.limits.max_records,
            "Walk started"
        );

        loop {
            if self.direction == QueryDirection::Forward
                && max_pages.is_some_and(|max| metrics.pages >= max)
            {
                tracing::debug!(pages = metrics.pages, "Page budget reached");
                break;
            }

            let query = PageQuery::new(self.direction, cursor.clone(), self.limits);
            let result = tokio::select! {
                result = self.source.query(&query) => result,
                _ = &mut shutdown => {
                    tracing::info!(cursor = %cursor, "Shutdown requested, stopping walk");
                    break;
                }
            };

            let page = match result {
                Ok(page) => page,
                Err(source) => {
                    tracing::error!(cursor = %cursor, error = %source, "Page query failed");
                    return Err(EngineError::Query { cursor, source });
                }
            };

            tracing::debug!(cursor = %cursor, records = page.len(), "Page received");
            metrics.record_page(page.len());

            for record in &page {
                if let Err(e) = processor.process(record).await {
                    tracing::warn!(record = %record.id, error = %e, "Record processing failed");
                    metrics.record_failure();
                    processor.on_failure(record, &e);
                }
            }

            cursor = cursor.advance(&page);

            if self.direction == QueryDirection::Backward {
                break;
            }
        }

        metrics.elapsed = started.elapsed();
        tracing::info!(
            cursor = %cursor,
            pages = metrics.pages,
            records = metrics.records,
            failed = metrics.records_failed,
            "Walk finished"
        );

        Ok(WalkOutcome { cursor, metrics })
    }
}
