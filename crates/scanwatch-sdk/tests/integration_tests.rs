//! Integration tests for ApiClient.
//!
//! Uses wiremock for HTTP mocking: query parameters, bearer auth, problem
//! responses and tests-endpoint parsing.

use chrono::{FixedOffset, TimeZone};
use scanwatch_domain::traits::{BuildDetailsSource, PageSource, TestsSource};
use scanwatch_domain::{
    BuildAttributes, BuildTool, Condition, PageCursor, PageLimits, PageQuery, QueryDirection,
    Record, RecordId, TestIncludes, TestsQuery, TimeWindow,
};
use scanwatch_sdk::{AccessKey, ApiClient, SdkError, BUILD_DELETED_PROBLEM};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(mock_server: &MockServer) -> ApiClient {
    let key = AccessKey::new("test-key").unwrap();
    ApiClient::new(&format!("{}/", mock_server.uri()), key).unwrap()
}

fn ts(day: u32, hour: u32) -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2023, 11, day, hour, 0, 0)
        .unwrap()
}

fn gradle_record(id: &str) -> Record {
    Record::new(RecordId::new(id), ts(1, 0), BuildTool::Gradle)
}

#[tokio::test]
async fn test_forward_query_from_instant() {
    let mock_server = MockServer::start().await;
    let from = ts(24, 9);

    Mock::given(method("GET"))
        .and(path("/api/builds"))
        .and(header("authorization", "Bearer test-key"))
        .and(query_param("reverse", "false"))
        .and(query_param("maxBuilds", "100"))
        .and(query_param("maxWaitSecs", "3"))
        .and(query_param("fromInstant", from.timestamp_millis().to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "availableAt": 1700000000000_i64, "buildToolType": "gradle"},
            {"id": "a2", "availableAt": 1700000001000_i64, "buildToolType": "maven"},
            {"id": "a3", "availableAt": 1700000002000_i64, "buildToolType": "bazel"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = PageQuery::new(
        QueryDirection::Forward,
        PageCursor::SinceInstant(from),
        PageLimits::default(),
    );
    let records = client.query(&query).await.expect("query failed");

    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
    assert_eq!(records[1].tool, BuildTool::Maven);
    assert_eq!(records[2].tool, BuildTool::Bazel);
}

#[tokio::test]
async fn test_backward_query_from_build() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/builds"))
        .and(query_param("reverse", "true"))
        .and(query_param("maxBuilds", "10"))
        .and(query_param("maxWaitSecs", "1"))
        .and(query_param("fromBuild", "b7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = PageQuery::new(
        QueryDirection::Backward,
        PageCursor::SinceRecord(RecordId::new("b7")),
        PageLimits {
            max_records: 10,
            max_wait_secs: 1,
        },
    );
    let records = client.query(&query).await.expect("query failed");
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_problem_response_is_parsed() {
    let mock_server = MockServer::start().await;

    let problem = json!({
        "type": BUILD_DELETED_PROBLEM,
        "title": "Build deleted",
        "status": 404,
        "detail": "The build was deleted."
    });
    Mock::given(method("GET"))
        .and(path("/api/builds/gone1/gradle-attributes"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_raw(problem.to_string(), "application/problem+json"),
        )
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client.attributes(&gradle_record("gone1")).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    let problem = err.problem().expect("expected a problem");
    assert!(problem.is_build_deleted());
    assert_eq!(problem.detail.as_deref(), Some("The build was deleted."));
}

#[tokio::test]
async fn test_plain_error_has_no_problem() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/builds"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = PageQuery::new(
        QueryDirection::Forward,
        PageCursor::SinceRecord(RecordId::new("x")),
        PageLimits::default(),
    );
    let err = client.query(&query).await.unwrap_err();

    match err {
        SdkError::ApiError {
            status,
            body,
            problem,
        } => {
            assert_eq!(status, 503);
            assert_eq!(body, "try later");
            assert!(problem.is_none());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_gradle_attributes_and_cache_performance() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/builds/g1/gradle-attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g1",
            "rootProjectName": "my-project",
            "buildDuration": 4321,
            "environment": {"username": "alice"}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/builds/g1/gradle-build-cache-performance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g1",
            "taskExecution": [
                {"taskPath": ":a", "avoidanceOutcome": "avoided_from_remote_cache"},
                {"taskPath": ":b", "avoidanceOutcome": "executed_not_cacheable"}
            ],
            "avoidanceSavingsSummary": {"total": 10, "ratio": 0.5}
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let record = gradle_record("g1");

    let attrs = client.attributes(&record).await.expect("attributes failed");
    assert!(matches!(attrs, BuildAttributes::Gradle(_)));
    assert_eq!(attrs.project_name(), "my-project");
    assert_eq!(attrs.build_duration_ms(), 4321);
    assert_eq!(attrs.username(), Some("alice"));

    let perf = client
        .cache_performance(&record)
        .await
        .expect("cache performance failed");
    assert_eq!(perf.cache_hits(), 1);
    assert_eq!(perf.total_executions(), 2);
}

#[tokio::test]
async fn test_maven_attributes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/builds/m1/maven-attributes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "m1",
            "topLevelProjectName": "maven-project",
            "buildDuration": 99,
            "environment": {}
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let record = Record::new(RecordId::new("m1"), ts(1, 0), BuildTool::Maven);
    let attrs = client.attributes(&record).await.expect("attributes failed");

    assert_eq!(attrs.project_name(), "maven-project");
    assert_eq!(attrs.username(), None);
}

#[tokio::test]
async fn test_unsupported_tool_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let record = Record::new(RecordId::new("z1"), ts(1, 0), BuildTool::Bazel);
    let err = client.attributes(&record).await.unwrap_err();
    assert!(matches!(err, SdkError::UnsupportedTool(_)));
}

#[tokio::test]
async fn test_test_containers_query() {
    let mock_server = MockServer::start().await;
    let window = TimeWindow::new(ts(24, 9), ts(25, 9)).unwrap();
    let condition = Condition::builds_between(&window).and_project(Some("myProject"));
    let expected_query = condition.to_string();

    Mock::given(method("GET"))
        .and(path("/api/tests/containers"))
        .and(query_param("testOutcomes", "failed"))
        .and(query_param("testOutcomes", "flaky"))
        .and(query_param("include", "buildScanIds"))
        .and(query_param("include", "workUnits"))
        .and(query_param("query", expected_query.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {
                    "name": "com.example.FooTest",
                    "outcomeDistribution": {"passed": 3, "failed": 1, "skipped": 0, "flaky": 0, "notSelected": 0, "total": 4},
                    "buildScanIdsByOutcome": {"failed": ["s1"], "flaky": []},
                    "workUnits": [{"maven": {"groupId": "com.example", "artifactId": "foo", "goalName": "test", "executionId": "default-test"}}]
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = TestsQuery::unstable(condition).including(TestIncludes::all());
    let containers = client.test_containers(&query).await.expect("query failed");

    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].name, "com.example.FooTest");
    assert_eq!(containers[0].instability_ratio(), 0.25);
    assert_eq!(containers[0].unstable_build_scan_ids(), vec!["s1"]);
    assert_eq!(containers[0].work_units.len(), 1);
}

#[tokio::test]
async fn test_test_cases_query() {
    let mock_server = MockServer::start().await;
    let window = TimeWindow::new(ts(24, 9), ts(25, 9)).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/tests/cases"))
        .and(query_param("container", "com.example.BarTest"))
        .and(query_param("testOutcomes", "flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"name": "testA", "outcomeDistribution": {"flaky": 2, "total": 2}},
                {"name": "testB", "outcomeDistribution": {"failed": 1, "total": 3}}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let query = TestsQuery::unstable(Condition::builds_between(&window));
    let cases = client
        .test_cases("com.example.BarTest", &query)
        .await
        .expect("query failed");

    let names: Vec<&str> = cases.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["testA", "testB"]);
    assert!(cases[0].build_scan_ids.is_none());
}

#[tokio::test]
async fn test_client_from_access_key_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/builds"))
        .and(header("authorization", "Bearer file-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "file-key").unwrap();

    let key = AccessKey::from_file(file.path()).unwrap();
    let client = ApiClient::new(&mock_server.uri(), key).unwrap();
    let query = PageQuery::new(
        QueryDirection::Backward,
        PageCursor::SinceInstant(ts(1, 0)),
        PageLimits::default(),
    );
    assert!(client.query(&query).await.unwrap().is_empty());
}
