//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Scanwatch - Tail the build stream and spot newly unstable tests.
#[derive(Debug, Parser)]
#[command(name = "scanwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server URL, overriding the active profile
    #[arg(long, env = "SCANWATCH_SERVER_URL", global = true)]
    pub server_url: Option<String>,

    /// File holding the API access key, overriding the active profile
    #[arg(long, env = "SCANWATCH_ACCESS_KEY_FILE", global = true)]
    pub access_key_file: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CliFormat {
    /// Human readable (default)
    Table,
    /// One JSON document per result
    Json,
    /// IDs and names only
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk builds and report build cache performance
    Builds(BuildsArgs),

    /// Detect test containers that recently became unstable
    Tests(TestsArgs),

    /// Manage connection profiles
    Profile(ProfileArgs),
}

/// Arguments for the builds command.
#[derive(Debug, Args)]
pub struct BuildsArgs {
    /// Only report builds of this project
    #[arg(long)]
    pub project_name: Option<String>,

    /// Report the most recent page of builds and stop
    #[arg(long)]
    pub reverse: bool,

    /// Maximum builds per page
    #[arg(long)]
    pub max_builds: Option<u32>,

    /// Maximum seconds the server may wait for new builds
    #[arg(long)]
    pub max_wait_secs: Option<u32>,

    /// How far back a forward walk starts, in minutes
    #[arg(long)]
    pub lookback_minutes: Option<u32>,

    /// Stop after this many pages
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_pages: Option<usize>,
}

/// Where detected containers are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReporterKind {
    /// Print to standard output
    StandardOutput,
    /// Open one GitHub issue per container with the `gh` CLI
    GithubCli,
}

/// Arguments for the tests command.
#[derive(Debug, Args)]
pub struct TestsArgs {
    /// Only consider builds of this project
    #[arg(long)]
    pub project_name: Option<String>,

    /// Reporter for detected containers
    #[arg(long, value_enum, default_value = "standard-output")]
    pub reporter: ReporterKind,

    /// Repository to open issues in (required by the GitHub reporter)
    #[arg(long)]
    pub github_repo: Option<String>,

    /// Print the `gh` commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip fetching unstable test cases per container
    #[arg(long)]
    pub no_cases: bool,
}

/// Arguments for the profile command.
#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show the active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,

        /// Server URL
        #[arg(long)]
        url: String,

        /// File holding the API access key
        #[arg(long)]
        key_file: Option<PathBuf>,

        /// Default project filter
        #[arg(long)]
        project_name: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}
