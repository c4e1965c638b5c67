//! Error types for engine operations

use scanwatch_domain::{DomainError, PageCursor};
use thiserror::Error;

/// Errors that end a walk or a detection run
///
/// `E` is the error type of the underlying source.
#[derive(Error, Debug)]
pub enum EngineError<E> {
    /// The page source failed; `cursor` is the last cursor that was queried
    /// and is safe to resume from
    #[error("Query failed at cursor {cursor}: {source}")]
    Query {
        /// Cursor of the failed query
        cursor: PageCursor,
        /// Underlying source error
        source: E,
    },

    /// A caller-supplied argument violates a precondition; raised before any
    /// source call
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// A tests source call failed
    #[error("Source error: {0}")]
    Source(E),
}

impl<E> EngineError<E> {
    /// Cursor to resume from after a query failure
    pub fn resume_cursor(&self) -> Option<&PageCursor> {
        match self {
            EngineError::Query { cursor, .. } => Some(cursor),
            _ => None,
        }
    }
}

/// Invalid engine configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Derived windows are unusable
    #[error("Invalid configuration: {0}")]
    Window(#[from] DomainError),
}
