//! Structured API problems (`application/problem+json`).

use serde::{Deserialize, Serialize};

/// Media type of structured problem responses
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Problem type reported when a referenced build has been deleted
pub const BUILD_DELETED_PROBLEM: &str = "urn:gradle:enterprise:api:problems:build-deleted";

/// A machine-readable problem returned with an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProblem {
    /// Problem type URI
    #[serde(rename = "type")]
    pub problem_type: String,

    /// Short summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status repeated in the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Human-readable explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiProblem {
    /// Parse a problem from an error response
    ///
    /// Returns `None` unless the content type is the problem media type
    /// (parameters such as `charset` are ignored), and `None` when the body
    /// does not parse.
    pub fn maybe_parse(content_type: Option<&str>, body: &str) -> Option<Self> {
        let media_type = content_type?.split(';').next()?.trim();
        if !media_type.eq_ignore_ascii_case(PROBLEM_CONTENT_TYPE) {
            return None;
        }

        match serde_json::from_str(body) {
            Ok(problem) => Some(problem),
            Err(e) => {
                tracing::debug!(error = %e, "problem response body did not parse");
                None
            }
        }
    }

    /// Whether the problem reports a deleted build
    pub fn is_build_deleted(&self) -> bool {
        self.problem_type == BUILD_DELETED_PROBLEM
    }
}
