//! Test entity module - test containers, test cases and their outcomes

use crate::condition::Condition;
use std::cmp::Ordering;
use std::fmt;

/// Outcome of a test execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestOutcome {
    /// Passed
    Passed,
    /// Failed
    Failed,
    /// Skipped
    Skipped,
    /// Failed then passed on retry
    Flaky,
    /// Not selected by test selection
    NotSelected,
}

impl TestOutcome {
    /// Outcomes that make a test unstable
    pub const UNSTABLE: [TestOutcome; 2] = [TestOutcome::Failed, TestOutcome::Flaky];

    /// Get the wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::Skipped => "skipped",
            TestOutcome::Flaky => "flaky",
            TestOutcome::NotSelected => "notSelected",
        }
    }
}

/// Distribution of outcomes across executions of a test entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutcomeDistribution {
    /// Passed executions
    pub passed: u64,
    /// Failed executions
    pub failed: u64,
    /// Skipped executions
    pub skipped: u64,
    /// Flaky executions
    pub flaky: u64,
    /// Executions not selected
    pub not_selected: u64,
    /// All executions
    pub total: u64,
}

impl OutcomeDistribution {
    /// Distribution with only failed, flaky and total counts set
    pub fn unstable(failed: u64, flaky: u64, total: u64) -> Self {
        Self {
            failed,
            flaky,
            total,
            ..Self::default()
        }
    }

    /// `(failed + flaky) / total`, or 0 when there were no executions
    pub fn instability_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.failed + self.flaky) as f64 / self.total as f64
    }
}

impl fmt::Display for OutcomeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "🔴 failed: {}, 🟡 flaky: {}, 💯 total: {}",
            self.failed, self.flaky, self.total
        )
    }
}

/// Example build scan IDs, partitioned by outcome
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildScanIdsByOutcome {
    /// Builds where the entity failed
    pub failed: Vec<String>,
    /// Builds where the entity was flaky
    pub flaky: Vec<String>,
}

impl BuildScanIdsByOutcome {
    /// Failed then flaky IDs, in that order
    pub fn unstable(&self) -> impl Iterator<Item = &str> {
        self.failed
            .iter()
            .chain(self.flaky.iter())
            .map(String::as_str)
    }
}

/// Build-tool work unit that executed a test entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    /// Gradle task
    Gradle {
        /// Project name
        project_name: String,
        /// Task path
        task_path: String,
    },

    /// Maven goal execution
    Maven {
        /// Group ID
        group_id: String,
        /// Artifact ID
        artifact_id: String,
        /// Goal name
        goal_name: String,
        /// Execution ID
        execution_id: String,
    },

    /// Bazel target
    Bazel {
        /// Package name
        package_name: String,
        /// Target name
        target_name: String,
    },
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkUnit::Gradle {
                project_name,
                task_path,
            } => write!(f, "{} > {}", project_name, task_path),
            WorkUnit::Maven {
                group_id,
                artifact_id,
                goal_name,
                execution_id,
            } => write!(f, "{}:{}:{}@{}", group_id, artifact_id, goal_name, execution_id),
            WorkUnit::Bazel {
                package_name,
                target_name,
            } => write!(f, "{} {}", package_name, target_name),
        }
    }
}

/// A test container (class, suite) or test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEntity {
    /// Stable name (e.g. fully qualified class name)
    pub name: String,

    /// Outcome counts
    pub outcome_distribution: OutcomeDistribution,

    /// Example build scan IDs, when requested
    pub build_scan_ids: Option<BuildScanIdsByOutcome>,

    /// Work units that ran the entity, when requested
    pub work_units: Vec<WorkUnit>,
}

impl TestEntity {
    /// Create an entity with just a name and distribution
    pub fn new(name: impl Into<String>, outcome_distribution: OutcomeDistribution) -> Self {
        Self {
            name: name.into(),
            outcome_distribution,
            build_scan_ids: None,
            work_units: Vec::new(),
        }
    }

    /// Instability ratio of the entity
    pub fn instability_ratio(&self) -> f64 {
        self.outcome_distribution.instability_ratio()
    }

    /// Failed then flaky example build scan IDs
    pub fn unstable_build_scan_ids(&self) -> Vec<&str> {
        self.build_scan_ids
            .as_ref()
            .map(|ids| ids.unstable().collect())
            .unwrap_or_default()
    }
}

/// Ordering for unstable entities: ratio descending, then name ascending
pub fn compare_instability(a: &TestEntity, b: &TestEntity) -> Ordering {
    b.instability_ratio()
        .total_cmp(&a.instability_ratio())
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort entities so the most unstable come first
///
/// Equal ratios are ordered by name so the result is deterministic.
pub fn rank_unstable(entities: &mut [TestEntity]) {
    entities.sort_by(compare_instability);
}

/// Extra fields to include in a tests query response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestIncludes {
    /// Include example build scan IDs
    pub build_scan_ids: bool,
    /// Include work units
    pub work_units: bool,
}

impl TestIncludes {
    /// Include everything
    pub fn all() -> Self {
        Self {
            build_scan_ids: true,
            work_units: true,
        }
    }
}

/// Query for test containers or cases
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestsQuery {
    /// Outcomes to match (an entity matches if it had any of them)
    pub outcomes: Vec<TestOutcome>,

    /// Extra response fields
    pub include: TestIncludes,

    /// Build predicate
    pub condition: Condition,
}

impl TestsQuery {
    /// Entities with failed or flaky outcomes in builds matching `condition`
    pub fn unstable(condition: Condition) -> Self {
        Self {
            outcomes: TestOutcome::UNSTABLE.to_vec(),
            include: TestIncludes::default(),
            condition,
        }
    }

    /// Request extra fields
    pub fn including(mut self, include: TestIncludes) -> Self {
        self.include = include;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, failed: u64, flaky: u64, total: u64) -> TestEntity {
        TestEntity::new(name, OutcomeDistribution::unstable(failed, flaky, total))
    }

    #[test]
    fn test_instability_ratio() {
        assert_eq!(entity("a", 1, 1, 4).instability_ratio(), 0.5);
        assert_eq!(entity("b", 1, 2, 5).instability_ratio(), 0.6);
    }

    #[test]
    fn test_zero_total_ratio() {
        assert_eq!(entity("a", 0, 0, 0).instability_ratio(), 0.0);
        // Inconsistent data must not produce NaN or infinity
        assert_eq!(entity("a", 3, 0, 0).instability_ratio(), 0.0);
    }

    #[test]
    fn test_rank_by_ratio_descending() {
        let mut entities = vec![entity("low", 1, 0, 10), entity("high", 5, 0, 5), entity("mid", 1, 1, 4)];
        rank_unstable(&mut entities);
        let names: Vec<_> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_rank_ties_by_name() {
        let mut entities = vec![entity("zeta", 1, 0, 2), entity("alpha", 2, 0, 4), entity("mu", 0, 3, 6)];
        rank_unstable(&mut entities);
        let names: Vec<_> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_outcome_distribution_display() {
        assert_eq!(
            OutcomeDistribution::unstable(1, 2, 5).to_string(),
            "🔴 failed: 1, 🟡 flaky: 2, 💯 total: 5"
        );
    }

    #[test]
    fn test_work_unit_display() {
        let gradle = WorkUnit::Gradle {
            project_name: "project".to_string(),
            task_path: ":test".to_string(),
        };
        let maven = WorkUnit::Maven {
            group_id: "org.example".to_string(),
            artifact_id: "core".to_string(),
            goal_name: "test".to_string(),
            execution_id: "default-test".to_string(),
        };
        let bazel = WorkUnit::Bazel {
            package_name: "//core".to_string(),
            target_name: "tests".to_string(),
        };
        assert_eq!(gradle.to_string(), "project > :test");
        assert_eq!(maven.to_string(), "org.example:core:test@default-test");
        assert_eq!(bazel.to_string(), "//core tests");
    }

    #[test]
    fn test_unstable_build_scan_ids_order() {
        let mut e = entity("a", 1, 2, 5);
        assert!(e.unstable_build_scan_ids().is_empty());

        e.build_scan_ids = Some(BuildScanIdsByOutcome {
            failed: vec!["123".to_string()],
            flaky: vec!["456".to_string(), "789".to_string()],
        });
        assert_eq!(e.unstable_build_scan_ids(), vec!["123", "456", "789"]);
    }

    #[test]
    fn test_unstable_query() {
        let at = chrono::DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap();
        let query = TestsQuery::unstable(Condition::builds_since(at)).including(TestIncludes::all());
        assert_eq!(query.outcomes, vec![TestOutcome::Failed, TestOutcome::Flaky]);
        assert!(query.include.build_scan_ids);
        assert!(query.include.work_units);
    }
}
