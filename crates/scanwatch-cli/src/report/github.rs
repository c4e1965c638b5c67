//! One GitHub issue per container, created with the `gh` CLI.

use super::example_build_scans;
use crate::error::{CliError, Result};
use chrono::{DateTime, FixedOffset};
use scanwatch_domain::condition::format_timestamp;
use scanwatch_domain::TimeWindow;
use scanwatch_engine::UnstableContainer;
use scanwatch_sdk::links;
use std::fmt::Write;
use tokio::process::Command;

const POWERED_BY: &str = "Powered by Develocity API: https://docs.gradle.com/enterprise/api-manual/";

/// Creates issues with `gh issue create`
pub struct GitHubCliReporter {
    server_url: String,
    repo: String,
    now: DateTime<FixedOffset>,
    window: TimeWindow,
    dry_run: bool,
}

impl GitHubCliReporter {
    /// Create a reporter for issues in `repo` about instability within `window`
    pub fn new(
        server_url: impl Into<String>,
        repo: impl Into<String>,
        now: DateTime<FixedOffset>,
        window: TimeWindow,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            repo: repo.into(),
            now,
            window,
            dry_run: false,
        }
    }

    /// Print the commands instead of running them
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Arguments of the `gh` invocation for one container, program included
    pub fn command(&self, unstable: &UnstableContainer) -> Vec<String> {
        vec![
            "gh".to_string(),
            "issue".to_string(),
            "create".to_string(),
            "--repo".to_string(),
            self.repo.clone(),
            "--title".to_string(),
            issue_title(unstable),
            "--body".to_string(),
            self.issue_body(unstable),
        ]
    }

    /// The `gh` invocation for one container as a line a POSIX shell can run
    pub fn dry_run_line(&self, unstable: &UnstableContainer) -> String {
        self.command(unstable)
            .iter()
            .map(|arg| shell_quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Report every container, stopping at the first failed `gh` run
    pub async fn report(&self, containers: &[UnstableContainer]) -> Result<()> {
        for unstable in containers {
            if self.dry_run {
                println!("{}", self.dry_run_line(unstable));
                continue;
            }

            let args = self.command(unstable);
            tracing::info!(
                container = %unstable.container.name,
                repo = %self.repo,
                "Creating GitHub issue"
            );
            let status = Command::new("gh")
                .args(&args[1..])
                .status()
                .await
                .map_err(|e| CliError::Reporter(format!("Failed to run gh: {}", e)))?;
            if !status.success() {
                return Err(CliError::Reporter(format!(
                    "gh issue create failed for {} ({})",
                    unstable.container.name, status
                )));
            }
        }
        Ok(())
    }

    fn issue_body(&self, unstable: &UnstableContainer) -> String {
        let container = &unstable.container;
        let mut body = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(body, "## Summary");
        let _ = writeln!(
            body,
            "Previously stable test container `{}` became unstable between `{}` and `{}`.",
            container.name,
            format_timestamp(&self.window.start),
            format_timestamp(&self.window.end)
        );
        let _ = writeln!(body, "Outcome distribution: {}.", container.outcome_distribution);
        let _ = writeln!(
            body,
            "[View in Tests dashboard.]({})",
            links::tests_dashboard_url(&self.server_url, &container.name, self.now)
        );
        let _ = writeln!(body);

        if !unstable.cases.is_empty() {
            let _ = writeln!(body, "### Unstable cases");
            for case in &unstable.cases {
                let _ = writeln!(body, "* `{}` ({})", case.name, case.outcome_distribution);
            }
            let _ = writeln!(body);
        }

        let _ = writeln!(body, "### Example Build Scans");
        let (shown, hidden) = example_build_scans(container);
        for id in shown {
            let _ = writeln!(body, "* {}", links::build_scan_url(&self.server_url, id));
        }
        if hidden > 0 {
            let _ = writeln!(body, "* +{} more", hidden);
        }
        let _ = writeln!(body);

        body.push_str(POWERED_BY);
        body
    }
}

fn issue_title(unstable: &UnstableContainer) -> String {
    format!("Investigate unstable outcomes of `{}`", unstable.container.name)
}

/// Single-quote `arg` unless every character is shell-safe
fn shell_quote(arg: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "-_./:=@+,%".contains(c);
    if !arg.is_empty() && arg.chars().all(safe) {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', "'\\''"))
}
