//! Scanwatch CLI library.
//!
//! Argument parsing, configuration profiles, command execution and report
//! formatting for the `scanwatch` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod report;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
