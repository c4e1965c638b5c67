//! Tests command implementation.

use crate::cli::{ReporterKind, TestsArgs};
use crate::commands::{now, Connection};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::report::GitHubCliReporter;
use scanwatch_engine::{DetectorConfig, UnstableContainer, WindowedInstabilityDetector};

/// Execute the tests command.
///
/// Compares the configured baseline window with the recent window that
/// follows it and reports containers that only became unstable recently.
pub async fn execute_tests(
    args: TestsArgs,
    connection: &Connection,
    defaults: &DetectorConfig,
    formatter: &Formatter,
) -> Result<Vec<UnstableContainer>> {
    // Reject a reporter that cannot run before talking to the server.
    let github_repo = match (args.reporter, args.github_repo) {
        (ReporterKind::GithubCli, None) => {
            return Err(CliError::InvalidInput(
                "--github-repo is required by the github-cli reporter".to_string(),
            ))
        }
        (_, repo) => repo,
    };

    let mut config = defaults.clone();
    if args.no_cases {
        config.resolve_cases = false;
    }

    let now = now();
    let (baseline, recent) = config.windows(now)?;
    let project = args.project_name.or_else(|| connection.project_name.clone());

    let client = connection.client()?;
    let server_url = client.base_url().to_string();
    let detector = WindowedInstabilityDetector::new(client, config);
    let containers = detector
        .detect(&baseline, &recent, project.as_deref())
        .await?;

    match (args.reporter, github_repo) {
        (ReporterKind::GithubCli, Some(repo)) => {
            GitHubCliReporter::new(server_url, repo, now, recent)
                .dry_run(args.dry_run)
                .report(&containers)
                .await?;
            if !args.dry_run {
                eprintln!(
                    "{}",
                    formatter.success(&format!("Reported {} container(s)", containers.len()))
                );
            }
        }
        _ => println!(
            "{}",
            formatter.format_unstable_containers(&server_url, now, &containers)?
        ),
    }

    Ok(containers)
}
