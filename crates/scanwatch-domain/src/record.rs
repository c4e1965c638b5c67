//! Record module - build events and their tool-specific details

use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Opaque identifier of a build record
///
/// IDs are assigned by the source and are ordered by the source, not by this
/// crate: a cursor pointing at a record asks for everything after it in the
/// server's order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(String);

impl RecordId {
    /// Create a record ID from its string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build tool that produced a record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildTool {
    /// Gradle build
    Gradle,

    /// Maven build
    Maven,

    /// Bazel build
    Bazel,

    /// Any tool tag this crate does not know about
    Unsupported(String),
}

impl BuildTool {
    /// Parse the wire tag (`gradle`, `maven`, `bazel`)
    pub fn parse(tag: &str) -> Self {
        match tag {
            "gradle" => BuildTool::Gradle,
            "maven" => BuildTool::Maven,
            "bazel" => BuildTool::Bazel,
            other => BuildTool::Unsupported(other.to_string()),
        }
    }

    /// Get the wire tag
    pub fn as_str(&self) -> &str {
        match self {
            BuildTool::Gradle => "gradle",
            BuildTool::Maven => "maven",
            BuildTool::Bazel => "bazel",
            BuildTool::Unsupported(tag) => tag,
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A build record - one immutable event in the build stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Server-assigned ID (also the build scan ID)
    pub id: RecordId,

    /// When the record became available on the server
    pub available_at: DateTime<FixedOffset>,

    /// Build tool tag
    pub tool: BuildTool,
}

impl Record {
    /// Create a new record
    pub fn new(id: RecordId, available_at: DateTime<FixedOffset>, tool: BuildTool) -> Self {
        Self {
            id,
            available_at,
            tool,
        }
    }
}

/// Attributes of a Gradle build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleAttributes {
    /// Root project name
    pub root_project_name: String,

    /// Build duration in milliseconds
    pub build_duration_ms: u64,

    /// User that ran the build
    pub username: Option<String>,
}

/// Attributes of a Maven build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenAttributes {
    /// Top level project name
    pub top_level_project_name: String,

    /// Build duration in milliseconds
    pub build_duration_ms: u64,

    /// User that ran the build
    pub username: Option<String>,
}

/// Tool-specific build attributes, one variant per supported tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildAttributes {
    /// Gradle attributes
    Gradle(GradleAttributes),

    /// Maven attributes
    Maven(MavenAttributes),
}

impl BuildAttributes {
    /// The project name used for project filtering
    pub fn project_name(&self) -> &str {
        match self {
            BuildAttributes::Gradle(attrs) => &attrs.root_project_name,
            BuildAttributes::Maven(attrs) => &attrs.top_level_project_name,
        }
    }

    /// Build duration in milliseconds
    pub fn build_duration_ms(&self) -> u64 {
        match self {
            BuildAttributes::Gradle(attrs) => attrs.build_duration_ms,
            BuildAttributes::Maven(attrs) => attrs.build_duration_ms,
        }
    }

    /// User that ran the build
    pub fn username(&self) -> Option<&str> {
        match self {
            BuildAttributes::Gradle(attrs) => attrs.username.as_deref(),
            BuildAttributes::Maven(attrs) => attrs.username.as_deref(),
        }
    }
}

/// Avoidance outcome of a single task (Gradle) or goal (Maven) execution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AvoidanceOutcome {
    /// Up to date, not executed
    AvoidedUpToDate,
    /// Loaded from the local build cache
    AvoidedFromLocalCache,
    /// Loaded from the remote build cache
    AvoidedFromRemoteCache,
    /// Executed and cacheable
    ExecutedCacheable,
    /// Executed and not cacheable
    ExecutedNotCacheable,
    /// Executed with unknown cacheability
    ExecutedUnknownCacheability,
    /// Lifecycle task
    Lifecycle,
    /// Task had no sources
    NoSource,
    /// Skipped
    Skipped,
    /// Outcome tag not known to this crate
    Other(String),
}

impl AvoidanceOutcome {
    /// Parse the wire tag
    pub fn parse(tag: &str) -> Self {
        match tag {
            "avoided_up_to_date" => AvoidanceOutcome::AvoidedUpToDate,
            "avoided_from_local_cache" => AvoidanceOutcome::AvoidedFromLocalCache,
            "avoided_from_remote_cache" => AvoidanceOutcome::AvoidedFromRemoteCache,
            "executed_cacheable" => AvoidanceOutcome::ExecutedCacheable,
            "executed_not_cacheable" => AvoidanceOutcome::ExecutedNotCacheable,
            "executed_unknown_cacheability" => AvoidanceOutcome::ExecutedUnknownCacheability,
            "lifecycle" => AvoidanceOutcome::Lifecycle,
            "no-source" => AvoidanceOutcome::NoSource,
            "skipped" => AvoidanceOutcome::Skipped,
            other => AvoidanceOutcome::Other(other.to_string()),
        }
    }

    /// Whether this outcome was served from a build cache
    pub fn is_cache_hit(&self) -> bool {
        matches!(
            self,
            AvoidanceOutcome::AvoidedFromLocalCache | AvoidanceOutcome::AvoidedFromRemoteCache
        )
    }
}

/// Build cache performance breakdown of one build
#[derive(Debug, Clone, PartialEq)]
pub struct CachePerformance {
    /// One outcome per task/goal execution
    pub executions: Vec<AvoidanceOutcome>,

    /// Ratio of execution time saved by avoidance, as reported by the server
    pub avoidance_savings_ratio: f64,
}

impl CachePerformance {
    /// Number of executions served from a build cache
    pub fn cache_hits(&self) -> u64 {
        self.executions.iter().filter(|o| o.is_cache_hit()).count() as u64
    }

    /// Total number of executions
    pub fn total_executions(&self) -> u64 {
        self.executions.len() as u64
    }
}
