//! Builds command implementation.

use crate::cli::BuildsArgs;
use crate::commands::{now, Connection};
use crate::error::Result;
use crate::output::Formatter;
use scanwatch_engine::{
    BuildCacheReport, CachePerformanceProcessor, PaginatingWalker, WalkOutcome, WalkerConfig,
};

/// Execute the builds command.
///
/// A forward walk tails the build stream until Ctrl+C (or `--max-pages`)
/// and prints each report as soon as its build is processed. A reverse walk
/// reports the most recent page in one batch.
pub async fn execute_builds(
    args: BuildsArgs,
    connection: &Connection,
    defaults: &WalkerConfig,
    formatter: &Formatter,
) -> Result<WalkOutcome> {
    let walker_config = walker_config(&args, defaults);
    walker_config.validate()?;

    let project = args.project_name.or_else(|| connection.project_name.clone());
    let client = connection.client()?;
    let server_url = client.base_url().to_string();
    let cursor = walker_config.start_cursor(now());
    let walker = PaginatingWalker::new(client.clone(), &walker_config);

    let mut batch: Vec<BuildCacheReport> = Vec::new();
    let stream = !walker_config.reverse;
    let sink = |report: BuildCacheReport| {
        if !stream {
            batch.push(report);
            return;
        }
        match formatter.format_cache_report(&server_url, &report) {
            Ok(line) => println!("{}", line),
            Err(e) => {
                tracing::error!(build = %report.record.id, error = %e, "Failed to format report");
            }
        }
    };
    let mut processor = CachePerformanceProcessor::new(client, sink).with_project(project);

    let outcome = match args.max_pages {
        Some(max_pages) => walker.walk_pages(cursor, &mut processor, max_pages).await?,
        None if walker_config.reverse => walker.walk(cursor, &mut processor).await?,
        None => {
            eprintln!("{}", formatter.info("Tailing builds, press Ctrl+C to stop"));
            walker
                .walk_until(cursor, &mut processor, shutdown_signal())
                .await?
        }
    };
    let skipped = processor.skipped();
    drop(processor);

    if !stream {
        println!("{}", formatter.format_cache_reports(&server_url, &batch)?);
    }

    eprintln!("{}", outcome.metrics.summary());
    if skipped > 0 {
        eprintln!("Skipped: {}", skipped);
    }
    eprintln!("{}", formatter.info(&format!("Resume cursor: {}", outcome.cursor)));

    Ok(outcome)
}

/// Apply command-line overrides to the configured walker defaults.
fn walker_config(args: &BuildsArgs, defaults: &WalkerConfig) -> WalkerConfig {
    WalkerConfig {
        reverse: args.reverse || defaults.reverse,
        max_records: args.max_builds.unwrap_or(defaults.max_records),
        max_wait_secs: args.max_wait_secs.unwrap_or(defaults.max_wait_secs),
        lookback_minutes: args.lookback_minutes.unwrap_or(defaults.lookback_minutes),
    }
}

/// Completes on Ctrl+C; never completes when the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BuildsArgs {
        BuildsArgs {
            project_name: None,
            reverse: false,
            max_builds: None,
            max_wait_secs: None,
            lookback_minutes: None,
            max_pages: None,
        }
    }

    #[test]
    fn test_defaults_are_kept_without_flags() {
        let defaults = WalkerConfig {
            max_records: 50,
            ..WalkerConfig::default()
        };
        assert_eq!(walker_config(&args(), &defaults), defaults);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = BuildsArgs {
            reverse: true,
            max_builds: Some(10),
            max_wait_secs: Some(1),
            lookback_minutes: Some(60),
            ..args()
        };
        let config = walker_config(&args, &WalkerConfig::default());
        assert!(config.reverse);
        assert_eq!(config.max_records, 10);
        assert_eq!(config.max_wait_secs, 1);
        assert_eq!(config.lookback_minutes, 60);
    }

    #[test]
    fn test_reverse_from_config_survives() {
        let config = walker_config(&args(), &WalkerConfig::snapshot());
        assert!(config.reverse);
    }
}
