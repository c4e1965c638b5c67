//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! The HTTP implementations live in `scanwatch-sdk`; tests use in-memory fakes.

use crate::{BuildAttributes, CachePerformance, PageQuery, Record, TestEntity, TestsQuery};
use async_trait::async_trait;

/// Source of pages of build records
///
/// Implemented by the infrastructure layer (scanwatch-sdk)
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Error type for page queries
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch one page of records
    ///
    /// Forward queries return records oldest first, strictly after the cursor;
    /// backward queries return the most recent records first. The page may be
    /// shorter than the requested limit, or empty.
    async fn query(&self, query: &PageQuery) -> Result<Vec<Record>, Self::Error>;
}

/// Source of tool-specific details of a single build
///
/// Implemented by the infrastructure layer (scanwatch-sdk)
#[async_trait]
pub trait BuildDetailsSource: Send + Sync {
    /// Error type for detail queries
    type Error: std::error::Error + Send + Sync + 'static;

    /// Get the tool-specific attributes of a build
    ///
    /// Only called for records whose tool has an attributes variant.
    async fn attributes(&self, record: &Record) -> Result<BuildAttributes, Self::Error>;

    /// Get the build cache performance breakdown of a build
    async fn cache_performance(&self, record: &Record) -> Result<CachePerformance, Self::Error>;
}

/// Source of test containers and test cases
///
/// Implemented by the infrastructure layer (scanwatch-sdk)
#[async_trait]
pub trait TestsSource: Send + Sync {
    /// Error type for tests queries
    type Error: std::error::Error + Send + Sync + 'static;

    /// Query test containers
    async fn test_containers(&self, query: &TestsQuery) -> Result<Vec<TestEntity>, Self::Error>;

    /// Query the test cases of one container
    async fn test_cases(
        &self,
        container: &str,
        query: &TestsQuery,
    ) -> Result<Vec<TestEntity>, Self::Error>;
}

/// Handler invoked once per walked record
///
/// Implemented by the application layer (scanwatch-engine)
#[async_trait]
pub trait RecordProcessor: Send {
    /// Error type for processing a record
    type Error: std::fmt::Display + Send;

    /// Process a single record
    async fn process(&mut self, record: &Record) -> Result<(), Self::Error>;

    /// Called when [`RecordProcessor::process`] fails for a record
    ///
    /// The walk continues with the next record either way.
    fn on_failure(&mut self, _record: &Record, _error: &Self::Error) {}
}
