//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::render_standard;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use colored::*;
use scanwatch_engine::{BuildCacheReport, UnstableContainer};
use scanwatch_sdk::links;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format one cache report as soon as its build has been processed.
    pub fn format_cache_report(
        &self,
        server_url: &str,
        report: &BuildCacheReport,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(cache_report_line(server_url, report)),
            OutputFormat::Json => {
                Ok(serde_json::to_string(&cache_report_json(server_url, report))?)
            }
            OutputFormat::Quiet => Ok(report.record.id.to_string()),
        }
    }

    /// Format a finished batch of cache reports, as collected by a backward walk.
    pub fn format_cache_reports(
        &self,
        server_url: &str,
        reports: &[BuildCacheReport],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.format_cache_table(server_url, reports)),
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = reports
                    .iter()
                    .map(|r| cache_report_json(server_url, r))
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => {
                let ids: Vec<String> = reports.iter().map(|r| r.record.id.to_string()).collect();
                Ok(ids.join("\n"))
            }
        }
    }

    fn format_cache_table(&self, server_url: &str, reports: &[BuildCacheReport]) -> String {
        if reports.is_empty() {
            return self.colorize("No builds found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "Build Scan",
            "Project",
            "Available",
            "Duration (ms)",
            "User",
            "Cache hits %",
            "Savings %",
        ]);

        for report in reports {
            builder.push_record([
                links::build_scan_url(server_url, report.record.id.as_str()),
                report.attributes.project_name().to_string(),
                instant(&report.record.available_at),
                report.attributes.build_duration_ms().to_string(),
                report.attributes.username().unwrap_or("-").to_string(),
                report.cache_hit_percentage.to_string(),
                report.avoidance_savings_percentage.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format newly unstable containers.
    pub fn format_unstable_containers(
        &self,
        server_url: &str,
        now: DateTime<FixedOffset>,
        containers: &[UnstableContainer],
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => {
                if containers.is_empty() {
                    return Ok(self.info("No newly unstable test containers"));
                }
                Ok(render_standard(server_url, now, containers))
            }
            OutputFormat::Json => {
                let values: Vec<serde_json::Value> = containers
                    .iter()
                    .map(|c| unstable_container_json(server_url, now, c))
                    .collect();
                Ok(serde_json::to_string_pretty(&values)?)
            }
            OutputFormat::Quiet => {
                let names: Vec<&str> =
                    containers.iter().map(|c| c.container.name.as_str()).collect();
                Ok(names.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// UTC instant with a `Z` suffix and fractional seconds only when present.
fn instant(at: &DateTime<FixedOffset>) -> String {
    at.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn cache_report_line(server_url: &str, report: &BuildCacheReport) -> String {
    format!(
        "Build Scan | {} | Project: {} | 🗓  {} | ⏱  {} ms\t| 👤 {}\n - \tCache hit percentage: {}%\n - \tAvoidance savings ratio: {}%\n",
        links::build_scan_url(server_url, report.record.id.as_str()),
        report.attributes.project_name(),
        instant(&report.record.available_at),
        report.attributes.build_duration_ms(),
        report.attributes.username().unwrap_or("-"),
        report.cache_hit_percentage,
        report.avoidance_savings_percentage
    )
}

fn cache_report_json(server_url: &str, report: &BuildCacheReport) -> serde_json::Value {
    serde_json::json!({
        "id": report.record.id.as_str(),
        "url": links::build_scan_url(server_url, report.record.id.as_str()),
        "tool": report.record.tool.as_str(),
        "availableAt": instant(&report.record.available_at),
        "project": report.attributes.project_name(),
        "buildDurationMs": report.attributes.build_duration_ms(),
        "username": report.attributes.username(),
        "cacheHitPercentage": report.cache_hit_percentage.as_f64(),
        "avoidanceSavingsPercentage": report.avoidance_savings_percentage.as_f64()
    })
}

fn unstable_container_json(
    server_url: &str,
    now: DateTime<FixedOffset>,
    unstable: &UnstableContainer,
) -> serde_json::Value {
    let container = &unstable.container;
    let distribution = |e: &scanwatch_domain::TestEntity| {
        serde_json::json!({
            "failed": e.outcome_distribution.failed,
            "flaky": e.outcome_distribution.flaky,
            "total": e.outcome_distribution.total
        })
    };

    serde_json::json!({
        "name": container.name,
        "outcomeDistribution": distribution(container),
        "dashboard": links::tests_dashboard_url(server_url, &container.name, now),
        "cases": unstable
            .cases
            .iter()
            .map(|c| serde_json::json!({"name": c.name, "outcomeDistribution": distribution(c)}))
            .collect::<Vec<_>>(),
        "workUnits": container
            .work_units
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>(),
        "buildScans": container
            .unstable_build_scan_ids()
            .into_iter()
            .map(|id| links::build_scan_url(server_url, id))
            .collect::<Vec<_>>()
    })
}
