//! HTTP client for the build-telemetry REST API.

use crate::access_key::AccessKey;
use crate::error::SdkError;
use crate::links;
use crate::models::{
    gradle_attributes_from_api, gradle_cache_performance_from_api, maven_attributes_from_api,
    maven_cache_performance_from_api, record_from_api, test_entity_from_api, ApiBuild,
    ApiGradleAttributes, ApiGradleBuildCachePerformance, ApiMavenAttributes,
    ApiMavenBuildCachePerformance, ApiTestsResponse,
};
use crate::problem::ApiProblem;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use scanwatch_domain::traits::{BuildDetailsSource, PageSource, TestsSource};
use scanwatch_domain::{
    BuildAttributes, BuildTool, CachePerformance, PageCursor, PageQuery, Record, TestEntity,
    TestsQuery,
};
use serde::de::DeserializeOwned;
use std::time::Duration as StdDuration;

/// Request timeout; generous because build queries long-poll for `maxWaitSecs`
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(60);

/// Client for one API server
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    access_key: AccessKey,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `server_url`
    ///
    /// A trailing `/` on the URL is ignored.
    pub fn new(server_url: &str, access_key: AccessKey) -> Result<Self, SdkError> {
        let base_url = server_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SdkError::ConfigError("Server URL is empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SdkError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            access_key,
            http,
        })
    }

    /// Server URL without the trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link to the build scan of `build_id`
    pub fn build_scan_url(&self, build_id: &str) -> String {
        links::build_scan_url(&self.base_url, build_id)
    }

    /// Link to the tests dashboard for one container over the week before `now`
    pub fn tests_dashboard_url(&self, container: &str, now: DateTime<FixedOffset>) -> String {
        links::tests_dashboard_url(&self.base_url, container, now)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, SdkError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, params = ?params, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.access_key.expose())
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let problem = ApiProblem::maybe_parse(content_type.as_deref(), &body);

            return Err(SdkError::ApiError {
                status: status.as_u16(),
                body,
                problem,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn tests_params(query: &TestsQuery) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = query
            .outcomes
            .iter()
            .map(|o| ("testOutcomes", o.as_str().to_string()))
            .collect();
        if query.include.build_scan_ids {
            params.push(("include", "buildScanIds".to_string()));
        }
        if query.include.work_units {
            params.push(("include", "workUnits".to_string()));
        }
        params.push(("query", query.condition.to_string()));
        params
    }

    async fn tests(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<TestEntity>, SdkError> {
        let response: ApiTestsResponse = self.get_json(path, params).await?;
        response
            .content
            .into_iter()
            .map(test_entity_from_api)
            .collect()
    }
}

#[async_trait]
impl PageSource for ApiClient {
    type Error = SdkError;

    async fn query(&self, query: &PageQuery) -> Result<Vec<Record>, SdkError> {
        let mut params = vec![
            ("reverse", query.direction.is_reverse().to_string()),
            ("maxBuilds", query.limits.max_records.to_string()),
            ("maxWaitSecs", query.limits.max_wait_secs.to_string()),
        ];
        match &query.cursor {
            PageCursor::SinceInstant(at) => {
                params.push(("fromInstant", at.timestamp_millis().to_string()))
            }
            PageCursor::SinceRecord(id) => params.push(("fromBuild", id.as_str().to_string())),
        }

        let builds: Vec<ApiBuild> = self.get_json("/api/builds", &params).await?;
        builds.into_iter().map(record_from_api).collect()
    }
}

#[async_trait]
impl BuildDetailsSource for ApiClient {
    type Error = SdkError;

    async fn attributes(&self, record: &Record) -> Result<BuildAttributes, SdkError> {
        let id = record.id.as_str();
        match &record.tool {
            BuildTool::Gradle => {
                let attrs: ApiGradleAttributes = self
                    .get_json(&format!("/api/builds/{}/gradle-attributes", id), &[])
                    .await?;
                Ok(BuildAttributes::Gradle(gradle_attributes_from_api(attrs)))
            }
            BuildTool::Maven => {
                let attrs: ApiMavenAttributes = self
                    .get_json(&format!("/api/builds/{}/maven-attributes", id), &[])
                    .await?;
                Ok(BuildAttributes::Maven(maven_attributes_from_api(attrs)))
            }
            other => Err(SdkError::UnsupportedTool(other.to_string())),
        }
    }

    async fn cache_performance(&self, record: &Record) -> Result<CachePerformance, SdkError> {
        let id = record.id.as_str();
        match &record.tool {
            BuildTool::Gradle => {
                let perf: ApiGradleBuildCachePerformance = self
                    .get_json(
                        &format!("/api/builds/{}/gradle-build-cache-performance", id),
                        &[],
                    )
                    .await?;
                Ok(gradle_cache_performance_from_api(perf))
            }
            BuildTool::Maven => {
                let perf: ApiMavenBuildCachePerformance = self
                    .get_json(
                        &format!("/api/builds/{}/maven-build-cache-performance", id),
                        &[],
                    )
                    .await?;
                Ok(maven_cache_performance_from_api(perf))
            }
            other => Err(SdkError::UnsupportedTool(other.to_string())),
        }
    }
}

#[async_trait]
impl TestsSource for ApiClient {
    type Error = SdkError;

    async fn test_containers(&self, query: &TestsQuery) -> Result<Vec<TestEntity>, SdkError> {
        let params = Self::tests_params(query);
        self.tests("/api/tests/containers", &params).await
    }

    async fn test_cases(
        &self,
        container: &str,
        query: &TestsQuery,
    ) -> Result<Vec<TestEntity>, SdkError> {
        let mut params = vec![("container", container.to_string())];
        params.extend(Self::tests_params(query));
        self.tests("/api/tests/cases", &params).await
    }
}
