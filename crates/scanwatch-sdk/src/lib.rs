//! Scanwatch Rust SDK
//!
//! Client library for the build-telemetry REST API: build pages, build
//! attributes, build cache performance, test containers and test cases.
//! [`ApiClient`] implements the source traits from `scanwatch-domain`, so the
//! engine can walk and analyse a live server through it.
//!
//! # Example
//!
//! ```no_run
//! use scanwatch_domain::traits::PageSource;
//! use scanwatch_domain::{PageCursor, PageLimits, PageQuery, QueryDirection};
//! use scanwatch_sdk::{AccessKey, ApiClient};
//!
//! # async fn example() -> Result<(), scanwatch_sdk::SdkError> {
//! let key = AccessKey::from_file("access-key.txt")?;
//! let client = ApiClient::new("https://scans.example.com/", key)?;
//!
//! let query = PageQuery::new(
//!     QueryDirection::Backward,
//!     PageCursor::SinceInstant(chrono::Local::now().fixed_offset()),
//!     PageLimits::default(),
//! );
//! let records = client.query(&query).await?;
//! println!("{} recent builds", records.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod access_key;
mod client;
mod error;
pub mod links;
mod models;
mod problem;

pub use access_key::AccessKey;
pub use client::ApiClient;
pub use error::SdkError;
pub use problem::{ApiProblem, BUILD_DELETED_PROBLEM, PROBLEM_CONTENT_TYPE};
