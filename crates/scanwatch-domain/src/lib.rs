//! Scanwatch Domain Layer
//!
//! This crate contains the data model and pure algorithms shared by every other
//! Scanwatch crate. It performs no I/O: records and test entities arrive through
//! the trait seams in [`traits`], and everything here is a value type or a pure
//! function over value types.
//!
//! ## Key Concepts
//!
//! - **Record**: an immutable build event with an opaque, server-ordered ID
//! - **PageCursor**: a resumable position in the build stream
//! - **Condition**: the textual query predicate grammar (`field:[a to b]`, `field>=a`, ...)
//! - **TestEntity**: a test container or case with its outcome distribution
//! - **Percentage**: exact half-up rounding to two decimals
//!
//! ## Architecture
//!
//! - No HTTP, no serialization, no logging
//! - Infrastructure implementations live in `scanwatch-sdk`
//! - Walk and detection orchestration lives in `scanwatch-engine`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod condition;
pub mod cursor;
pub mod error;
pub mod percentage;
pub mod record;
pub mod test_entity;
pub mod traits;

// Re-exports for convenience
pub use condition::{Condition, TimeWindow};
pub use cursor::{
    PageCursor, PageLimits, PageQuery, QueryDirection, DEFAULT_MAX_RECORDS, DEFAULT_MAX_WAIT_SECS,
};
pub use error::DomainError;
pub use percentage::Percentage;
pub use record::{
    AvoidanceOutcome, BuildAttributes, BuildTool, CachePerformance, GradleAttributes,
    MavenAttributes, Record, RecordId,
};
pub use test_entity::{
    compare_instability, rank_unstable, BuildScanIdsByOutcome, OutcomeDistribution, TestEntity,
    TestIncludes, TestOutcome, TestsQuery, WorkUnit,
};
