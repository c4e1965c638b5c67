//! Wire models for the REST API and their conversion to domain types.

use crate::error::SdkError;
use chrono::DateTime;
use scanwatch_domain::{
    AvoidanceOutcome, BuildScanIdsByOutcome, BuildTool, CachePerformance, GradleAttributes,
    MavenAttributes, OutcomeDistribution, Record, RecordId, TestEntity, WorkUnit,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiBuild {
    pub id: String,
    /// Epoch milliseconds
    pub available_at: i64,
    pub build_tool_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiEnvironment {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGradleAttributes {
    pub root_project_name: String,
    #[serde(default)]
    pub build_duration: u64,
    #[serde(default)]
    pub environment: ApiEnvironment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiMavenAttributes {
    pub top_level_project_name: String,
    #[serde(default)]
    pub build_duration: u64,
    #[serde(default)]
    pub environment: ApiEnvironment,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiExecution {
    pub avoidance_outcome: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiAvoidanceSavingsSummary {
    #[serde(default)]
    pub ratio: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGradleBuildCachePerformance {
    #[serde(default)]
    pub task_execution: Vec<ApiExecution>,
    #[serde(default)]
    pub avoidance_savings_summary: ApiAvoidanceSavingsSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiMavenBuildCachePerformance {
    #[serde(default)]
    pub goal_execution: Vec<ApiExecution>,
    #[serde(default)]
    pub avoidance_savings_summary: ApiAvoidanceSavingsSummary,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ApiOutcomeDistribution {
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,
    pub flaky: u64,
    pub not_selected: u64,
    pub total: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiBuildScanIdsByOutcome {
    pub failed: Vec<String>,
    pub flaky: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGradleWorkUnit {
    pub project_name: String,
    pub task_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiMavenWorkUnit {
    pub group_id: String,
    pub artifact_id: String,
    pub goal_name: String,
    pub execution_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiBazelWorkUnit {
    pub package_name: String,
    pub target_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiTestWorkUnit {
    pub gradle: Option<ApiGradleWorkUnit>,
    pub maven: Option<ApiMavenWorkUnit>,
    pub bazel: Option<ApiBazelWorkUnit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiTestOrContainer {
    pub name: String,
    #[serde(default)]
    pub outcome_distribution: ApiOutcomeDistribution,
    #[serde(default)]
    pub build_scan_ids_by_outcome: Option<ApiBuildScanIdsByOutcome>,
    #[serde(default)]
    pub work_units: Option<Vec<ApiTestWorkUnit>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiTestsResponse {
    #[serde(default)]
    pub content: Vec<ApiTestOrContainer>,
}

// Conversions to domain types

pub(crate) fn record_from_api(build: ApiBuild) -> Result<Record, SdkError> {
    let available_at = DateTime::from_timestamp_millis(build.available_at)
        .ok_or_else(|| {
            SdkError::InvalidResponse(format!(
                "Build {} has an out-of-range availableAt: {}",
                build.id, build.available_at
            ))
        })?
        .fixed_offset();

    Ok(Record::new(
        RecordId::new(build.id),
        available_at,
        BuildTool::parse(&build.build_tool_type),
    ))
}

pub(crate) fn gradle_attributes_from_api(attrs: ApiGradleAttributes) -> GradleAttributes {
    GradleAttributes {
        root_project_name: attrs.root_project_name,
        build_duration_ms: attrs.build_duration,
        username: attrs.environment.username,
    }
}

pub(crate) fn maven_attributes_from_api(attrs: ApiMavenAttributes) -> MavenAttributes {
    MavenAttributes {
        top_level_project_name: attrs.top_level_project_name,
        build_duration_ms: attrs.build_duration,
        username: attrs.environment.username,
    }
}

fn cache_performance(executions: Vec<ApiExecution>, ratio: f64) -> CachePerformance {
    CachePerformance {
        executions: executions
            .iter()
            .map(|e| AvoidanceOutcome::parse(&e.avoidance_outcome))
            .collect(),
        avoidance_savings_ratio: ratio,
    }
}

pub(crate) fn gradle_cache_performance_from_api(
    perf: ApiGradleBuildCachePerformance,
) -> CachePerformance {
    cache_performance(perf.task_execution, perf.avoidance_savings_summary.ratio)
}

pub(crate) fn maven_cache_performance_from_api(
    perf: ApiMavenBuildCachePerformance,
) -> CachePerformance {
    cache_performance(perf.goal_execution, perf.avoidance_savings_summary.ratio)
}

fn work_unit_from_api(unit: ApiTestWorkUnit) -> Result<WorkUnit, SdkError> {
    match unit {
        ApiTestWorkUnit {
            gradle: Some(g), ..
        } => Ok(WorkUnit::Gradle {
            project_name: g.project_name,
            task_path: g.task_path,
        }),
        ApiTestWorkUnit { maven: Some(m), .. } => Ok(WorkUnit::Maven {
            group_id: m.group_id,
            artifact_id: m.artifact_id,
            goal_name: m.goal_name,
            execution_id: m.execution_id,
        }),
        ApiTestWorkUnit { bazel: Some(b), .. } => Ok(WorkUnit::Bazel {
            package_name: b.package_name,
            target_name: b.target_name,
        }),
        _ => Err(SdkError::InvalidResponse(
            "Work unit has no gradle, maven or bazel details".to_string(),
        )),
    }
}

pub(crate) fn test_entity_from_api(entity: ApiTestOrContainer) -> Result<TestEntity, SdkError> {
    let d = entity.outcome_distribution;
    let work_units = entity
        .work_units
        .unwrap_or_default()
        .into_iter()
        .map(work_unit_from_api)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TestEntity {
        name: entity.name,
        outcome_distribution: OutcomeDistribution {
            passed: d.passed,
            failed: d.failed,
            skipped: d.skipped,
            flaky: d.flaky,
            not_selected: d.not_selected,
            total: d.total,
        },
        build_scan_ids: entity
            .build_scan_ids_by_outcome
            .map(|ids| BuildScanIdsByOutcome {
                failed: ids.failed,
                flaky: ids.flaky,
            }),
        work_units,
    })
}
