//! Errors raised by domain constructors

use thiserror::Error;

/// Invalid domain value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A time window that ends at or before it starts
    #[error("Window end {end} must be after start {start}")]
    EmptyWindow {
        /// Rendered start
        start: String,
        /// Rendered end
        end: String,
    },
}
