//! Walks and detection against a mocked API server

use chrono::{DateTime, FixedOffset, TimeZone};
use scanwatch_domain::{Condition, PageCursor, RecordId};
use scanwatch_engine::{
    default_windows, CachePerformanceProcessor, DetectorConfig, PaginatingWalker,
    WalkerConfig, WindowedInstabilityDetector,
};
use scanwatch_sdk::{AccessKey, ApiClient, BUILD_DELETED_PROBLEM};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2023, 11, 25, 12, 30, 45)
        .unwrap()
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), AccessKey::new("test-key").unwrap()).unwrap()
}

#[tokio::test]
async fn test_cache_walk_continues_past_deleted_build() {
    let server = MockServer::start().await;
    let config = WalkerConfig::default();
    let start = config.start_cursor(now());
    let PageCursor::SinceInstant(from) = &start else {
        panic!("forward walks start from an instant");
    };

    Mock::given(method("GET"))
        .and(path("/api/builds"))
        .and(query_param("fromInstant", from.timestamp_millis().to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "gone1", "availableAt": 1700000000000_i64, "buildToolType": "gradle"},
            {"id": "ok1", "availableAt": 1700000001000_i64, "buildToolType": "gradle"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/builds"))
        .and(query_param("fromBuild", "ok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/builds/gone1/gradle-attributes"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            json!({"type": BUILD_DELETED_PROBLEM, "detail": "gone"}).to_string(),
            "application/problem+json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/builds/ok1/gradle-attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rootProjectName": "app",
            "buildDuration": 1200,
            "environment": {"username": "ci"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/builds/ok1/gradle-build-cache-performance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "taskExecution": [
                {"avoidanceOutcome": "avoided_from_local_cache"},
                {"avoidanceOutcome": "executed_cacheable"},
                {"avoidanceOutcome": "executed_cacheable"}
            ],
            "avoidanceSavingsSummary": {"ratio": 0.25}
        })))
        .mount(&server)
        .await;

    let mut reports = Vec::new();
    let mut processor = CachePerformanceProcessor::new(client(&server), |r| reports.push(r));
    let walker = PaginatingWalker::new(client(&server), &config);

    let outcome = walker.walk_pages(start, &mut processor, 2).await.unwrap();
    drop(processor);

    assert_eq!(outcome.cursor, PageCursor::SinceRecord(RecordId::new("ok1")));
    assert_eq!(outcome.metrics.records, 2);
    assert_eq!(outcome.metrics.records_failed, 1);
    assert_eq!(outcome.metrics.empty_pages, 1);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].cache_hit_percentage.to_string(), "33.33");
    assert_eq!(reports[0].avoidance_savings_percentage.to_string(), "25.00");
}

#[tokio::test]
async fn test_newly_unstable_container_end_to_end() {
    let server = MockServer::start().await;
    let (baseline, recent) = default_windows(now());

    Mock::given(method("GET"))
        .and(path("/api/tests/containers"))
        .and(query_param("query", Condition::builds_between(&baseline).to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"name": "Foo", "outcomeDistribution": {"failed": 1, "total": 1}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tests/containers"))
        .and(query_param("query", Condition::builds_between(&recent).to_string()))
        .and(query_param("include", "workUnits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"name": "Foo", "outcomeDistribution": {"failed": 1, "total": 1}},
                {
                    "name": "Bar",
                    "outcomeDistribution": {"passed": 2, "failed": 2, "flaky": 1, "total": 5},
                    "buildScanIdsByOutcome": {"failed": ["s1", "s2"], "flaky": ["s3"]},
                    "workUnits": [{"gradle": {"projectName": "app", "taskPath": ":test"}}]
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tests/cases"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = DetectorConfig {
        resolve_cases: false,
        ..DetectorConfig::default()
    };
    let detector = WindowedInstabilityDetector::new(client(&server), config);
    let results = detector.detect(&baseline, &recent, None).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].container.name, "Bar");
    assert_eq!(results[0].container.instability_ratio(), 0.6);
    assert_eq!(results[0].container.unstable_build_scan_ids(), vec!["s1", "s2", "s3"]);
    assert!(results[0].cases.is_empty());
}
