//! Detection of newly unstable test containers
//!
//! A container is newly unstable when it had failed or flaky outcomes in the
//! recent window but none in the baseline window before it.

use crate::config::DetectorConfig;
use crate::error::EngineError;
use scanwatch_domain::traits::TestsSource;
use scanwatch_domain::{
    rank_unstable, Condition, TestEntity, TestIncludes, TestsQuery, TimeWindow,
};
use std::collections::HashSet;

/// A newly unstable container with its unstable cases, most unstable first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnstableContainer {
    /// The container
    pub container: TestEntity,

    /// Unstable cases in the recent window; empty when cases were not resolved
    pub cases: Vec<TestEntity>,
}

/// Compares a baseline window with the recent window that follows it
pub struct WindowedInstabilityDetector<S> {
    source: S,
    config: DetectorConfig,
}

impl<S: TestsSource> WindowedInstabilityDetector<S> {
    /// Create a detector
    pub fn new(source: S, config: DetectorConfig) -> Self {
        Self { source, config }
    }

    /// Detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Find containers unstable in `recent` that were stable in `baseline`
    ///
    /// Results are ranked by instability ratio, highest first, ties by name.
    /// Windows are checked before any query is issued.
    pub async fn detect(
        &self,
        baseline: &TimeWindow,
        recent: &TimeWindow,
        project: Option<&str>,
    ) -> Result<Vec<UnstableContainer>, EngineError<S::Error>> {
        check_preconditions(baseline, recent, project)?;

        tracing::info!(
            baseline = %baseline,
            recent = %recent,
            project = project.unwrap_or("*"),
            "Detecting newly unstable test containers"
        );

        let baseline_query =
            TestsQuery::unstable(Condition::builds_between(baseline).and_project(project));
        let baseline_names: HashSet<String> = self
            .source
            .test_containers(&baseline_query)
            .await
            .map_err(EngineError::Source)?
            .into_iter()
            .map(|entity| entity.name)
            .collect();
        tracing::debug!(count = baseline_names.len(), "Baseline unstable containers");

        let recent_condition = Condition::builds_between(recent).and_project(project);
        let recent_query =
            TestsQuery::unstable(recent_condition.clone()).including(TestIncludes::all());
        let recent_containers = self
            .source
            .test_containers(&recent_query)
            .await
            .map_err(EngineError::Source)?;
        tracing::debug!(count = recent_containers.len(), "Recent unstable containers");

        let mut newly_unstable = filter_newly_unstable(recent_containers, &baseline_names);
        rank_unstable(&mut newly_unstable);

        let mut results = Vec::with_capacity(newly_unstable.len());
        for container in newly_unstable {
            let cases = if self.config.resolve_cases {
                let cases_query = TestsQuery::unstable(recent_condition.clone());
                let mut cases = self
                    .source
                    .test_cases(&container.name, &cases_query)
                    .await
                    .map_err(EngineError::Source)?;
                rank_unstable(&mut cases);
                cases
            } else {
                Vec::new()
            };
            results.push(UnstableContainer { container, cases });
        }

        tracing::info!(count = results.len(), "Newly unstable test containers found");
        Ok(results)
    }
}

/// Keep entities whose name does not appear in the baseline
pub fn filter_newly_unstable(
    recent: Vec<TestEntity>,
    baseline_names: &HashSet<String>,
) -> Vec<TestEntity> {
    recent
        .into_iter()
        .filter(|entity| !baseline_names.contains(&entity.name))
        .collect()
}

fn check_preconditions<E>(
    baseline: &TimeWindow,
    recent: &TimeWindow,
    project: Option<&str>,
) -> Result<(), EngineError<E>> {
    for (label, window) in [("baseline", baseline), ("recent", recent)] {
        if window.end <= window.start {
            return Err(EngineError::Precondition(format!(
                "{} window is empty: {}",
                label, window
            )));
        }
    }
    if !baseline.precedes(recent) {
        return Err(EngineError::Precondition(format!(
            "recent window ({}) starts before the baseline window ({}) ends",
            recent, baseline
        )));
    }
    if project.is_some_and(|p| p.trim().is_empty()) {
        return Err(EngineError::Precondition(
            "project filter is empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, FixedOffset, TimeZone};
    use scanwatch_domain::OutcomeDistribution;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("tests source unavailable")]
    struct Unavailable;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 11, 25, 12, 0, 0)
            .unwrap()
    }

    fn windows() -> (TimeWindow, TimeWindow) {
        crate::config::default_windows(now())
    }

    fn entity(name: &str, failed: u64, flaky: u64, total: u64) -> TestEntity {
        TestEntity::new(name, OutcomeDistribution::unstable(failed, flaky, total))
    }

    /// Answers container queries by matching the rendered condition
    #[derive(Default)]
    struct FakeTests {
        by_condition: Vec<(String, Vec<TestEntity>)>,
        cases: Vec<(String, Vec<TestEntity>)>,
        calls: Mutex<Vec<String>>,
        fail: bool,
    }

    impl FakeTests {
        fn with_containers(mut self, condition: Condition, entities: Vec<TestEntity>) -> Self {
            self.by_condition.push((condition.to_string(), entities));
            self
        }

        fn with_cases(mut self, container: &str, cases: Vec<TestEntity>) -> Self {
            self.cases.push((container.to_string(), cases));
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TestsSource for FakeTests {
        type Error = Unavailable;

        async fn test_containers(
            &self,
            query: &TestsQuery,
        ) -> Result<Vec<TestEntity>, Unavailable> {
            let condition = query.condition.to_string();
            self.calls.lock().unwrap().push(format!("containers {}", condition));
            if self.fail {
                return Err(Unavailable);
            }
            Ok(self
                .by_condition
                .iter()
                .find(|(c, _)| *c == condition)
                .map(|(_, e)| e.clone())
                .unwrap_or_default())
        }

        async fn test_cases(
            &self,
            container: &str,
            _query: &TestsQuery,
        ) -> Result<Vec<TestEntity>, Unavailable> {
            self.calls.lock().unwrap().push(format!("cases {}", container));
            Ok(self
                .cases
                .iter()
                .find(|(c, _)| c == container)
                .map(|(_, e)| e.clone())
                .unwrap_or_default())
        }
    }

    fn no_cases() -> DetectorConfig {
        DetectorConfig {
            resolve_cases: false,
            ..DetectorConfig::default()
        }
    }

    #[tokio::test]
    async fn test_only_newly_unstable_containers_are_returned() {
        let (baseline, recent) = windows();
        let source = FakeTests::default()
            .with_containers(Condition::builds_between(&baseline), vec![entity("A", 1, 0, 2)])
            .with_containers(
                Condition::builds_between(&recent),
                vec![entity("A", 1, 0, 2), entity("B", 1, 0, 2)],
            );
        let detector = WindowedInstabilityDetector::new(source, no_cases());

        let results = detector.detect(&baseline, &recent, None).await.unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.container.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);
    }

    #[tokio::test]
    async fn test_ranking_by_ratio_then_name() {
        let (baseline, recent) = windows();
        let source = FakeTests::default().with_containers(
            Condition::builds_between(&recent),
            vec![
                entity("Zeta", 1, 0, 4),
                entity("Beta", 1, 1, 4),
                entity("Alpha", 1, 1, 4),
                entity("Gamma", 3, 0, 3),
            ],
        );
        let detector = WindowedInstabilityDetector::new(source, no_cases());

        let results = detector.detect(&baseline, &recent, None).await.unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.container.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha", "Beta", "Zeta"]);
    }

    #[tokio::test]
    async fn test_foo_bar_scenario() {
        let (baseline, recent) = windows();
        let source = FakeTests::default()
            .with_containers(Condition::builds_between(&baseline), vec![entity("Foo", 1, 0, 1)])
            .with_containers(
                Condition::builds_between(&recent),
                vec![entity("Foo", 1, 0, 1), entity("Bar", 2, 1, 5)],
            );
        let detector = WindowedInstabilityDetector::new(source, no_cases());

        let results = detector.detect(&baseline, &recent, None).await.unwrap();

        assert_eq!(results.len(), 1);
        let bar = &results[0];
        assert_eq!(bar.container.name, "Bar");
        assert_eq!(bar.container.instability_ratio(), 0.6);
        assert_eq!(
            scanwatch_domain::Percentage::from_ratio(bar.container.instability_ratio()).to_string(),
            "60.00"
        );
        assert!(bar.cases.is_empty());
        assert!(!detector
            .source
            .calls()
            .iter()
            .any(|c| c.starts_with("cases")));
    }

    #[tokio::test]
    async fn test_cases_are_resolved_and_ranked() {
        let (baseline, recent) = windows();
        let source = FakeTests::default()
            .with_containers(Condition::builds_between(&recent), vec![entity("Bar", 2, 1, 5)])
            .with_cases(
                "Bar",
                vec![entity("testSlow", 1, 0, 5), entity("testFlaky", 0, 2, 2)],
            );
        let detector = WindowedInstabilityDetector::new(source, DetectorConfig::default());

        let results = detector.detect(&baseline, &recent, None).await.unwrap();

        let cases: Vec<&str> = results[0].cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cases, vec!["testFlaky", "testSlow"]);
    }

    #[tokio::test]
    async fn test_project_filter_is_applied_to_both_windows() {
        let (baseline, recent) = windows();
        let source = FakeTests::default();
        let detector = WindowedInstabilityDetector::new(source, no_cases());

        detector
            .detect(&baseline, &recent, Some("myProject"))
            .await
            .unwrap();

        let calls = detector.source.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.ends_with("and project:myProject")));
    }

    #[tokio::test]
    async fn test_overlapping_windows_fail_before_any_query() {
        let (baseline, _) = windows();
        let overlapping = TimeWindow::new(baseline.end - Duration::hours(1), now()).unwrap();
        let detector = WindowedInstabilityDetector::new(FakeTests::default(), no_cases());

        let err = detector
            .detect(&baseline, &overlapping, None)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Precondition(_)));
        assert!(detector.source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_project_is_rejected() {
        let (baseline, recent) = windows();
        let detector = WindowedInstabilityDetector::new(FakeTests::default(), no_cases());

        let err = detector
            .detect(&baseline, &recent, Some("  "))
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Precondition(_)));
        assert!(detector.source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let (baseline, recent) = windows();
        let source = FakeTests {
            fail: true,
            ..FakeTests::default()
        };
        let detector = WindowedInstabilityDetector::new(source, no_cases());

        let err = detector.detect(&baseline, &recent, None).await.unwrap_err();
        assert!(matches!(err, EngineError::Source(Unavailable)));
    }

    #[test]
    fn test_filter_newly_unstable() {
        let baseline: HashSet<String> = ["A".to_string()].into_iter().collect();
        let recent = vec![entity("A", 1, 0, 1), entity("B", 1, 0, 1)];
        let kept = filter_newly_unstable(recent, &baseline);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "B");
    }
}
