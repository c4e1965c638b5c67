//! Build cache performance per walked build

use async_trait::async_trait;
use scanwatch_domain::traits::{BuildDetailsSource, RecordProcessor};
use scanwatch_domain::{BuildAttributes, BuildTool, CachePerformance, Percentage, Record};
use scanwatch_sdk::SdkError;

/// Cache effectiveness of one build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCacheReport {
    /// The build
    pub record: Record,

    /// Tool-specific build attributes
    pub attributes: BuildAttributes,

    /// Share of task or goal executions served from the local or remote cache
    pub cache_hit_percentage: Percentage,

    /// Avoidance savings ratio as a percentage
    pub avoidance_savings_percentage: Percentage,
}

impl BuildCacheReport {
    /// Compute the report for a build
    pub fn new(
        record: Record,
        attributes: BuildAttributes,
        performance: &CachePerformance,
    ) -> Self {
        Self {
            record,
            attributes,
            cache_hit_percentage: Percentage::of(
                performance.cache_hits(),
                performance.total_executions(),
            ),
            avoidance_savings_percentage: Percentage::from_ratio(
                performance.avoidance_savings_ratio,
            ),
        }
    }
}

/// Fetches attributes and cache performance for every walked build and
/// hands a [`BuildCacheReport`] to `sink`
///
/// Builds of tools without a cache performance endpoint are skipped, as are
/// builds of other projects when a project filter is set.
pub struct CachePerformanceProcessor<S, F> {
    source: S,
    project: Option<String>,
    sink: F,
    skipped: usize,
}

impl<S, F> CachePerformanceProcessor<S, F>
where
    S: BuildDetailsSource<Error = SdkError>,
    F: FnMut(BuildCacheReport) + Send,
{
    /// Create a processor reporting every supported build
    pub fn new(source: S, sink: F) -> Self {
        Self {
            source,
            project: None,
            sink,
            skipped: 0,
        }
    }

    /// Only report builds of `project`
    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    /// Builds skipped for tool or project
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[async_trait]
impl<S, F> RecordProcessor for CachePerformanceProcessor<S, F>
where
    S: BuildDetailsSource<Error = SdkError>,
    F: FnMut(BuildCacheReport) + Send,
{
    type Error = SdkError;

    async fn process(&mut self, record: &Record) -> Result<(), SdkError> {
        if !matches!(record.tool, BuildTool::Gradle | BuildTool::Maven) {
            tracing::info!(
                build = %record.id,
                tool = %record.tool,
                "Skipping build of unsupported tool"
            );
            self.skipped += 1;
            return Ok(());
        }

        let attributes = self.source.attributes(record).await?;
        if let Some(project) = &self.project {
            if attributes.project_name() != project {
                self.skipped += 1;
                return Ok(());
            }
        }

        let performance = self.source.cache_performance(record).await?;
        let report = BuildCacheReport::new(record.clone(), attributes, &performance);
        (self.sink)(report);
        Ok(())
    }

    fn on_failure(&mut self, record: &Record, error: &SdkError) {
        match error.problem() {
            Some(problem) if problem.is_build_deleted() => {
                tracing::warn!(
                    build = %record.id,
                    "Build was deleted before it could be processed"
                );
            }
            Some(problem) => {
                tracing::error!(
                    build = %record.id,
                    status = ?error.status(),
                    problem_type = %problem.problem_type,
                    detail = problem.detail.as_deref().unwrap_or(""),
                    "API problem while processing build"
                );
            }
            None => {
                tracing::error!(build = %record.id, error = %error, "Failed to process build");
            }
        }
    }
}
