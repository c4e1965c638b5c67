//! Plain-text report on standard output.

use super::{example_build_scans, with_distribution};
use chrono::{DateTime, FixedOffset};
use scanwatch_engine::UnstableContainer;
use scanwatch_sdk::links;
use std::fmt::Write;

/// Render one block per container
///
/// Each block lists the container with its outcome distribution, a tests
/// dashboard link, the unstable cases, the work units and up to five example
/// build scans.
pub fn render_standard(
    server_url: &str,
    now: DateTime<FixedOffset>,
    containers: &[UnstableContainer],
) -> String {
    let mut out = String::new();
    for unstable in containers {
        let container = &unstable.container;

        // Writing to a String cannot fail.
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", with_distribution(container));
        let _ = writeln!(
            out,
            "\tView in Tests dashboard: {}",
            links::tests_dashboard_url(server_url, &container.name, now)
        );
        let _ = writeln!(out, "\tUnstable test cases:");
        for case in &unstable.cases {
            let _ = writeln!(out, "\t\t{}", with_distribution(case));
        }
        let _ = writeln!(out, "\tWork units:");
        for work_unit in &container.work_units {
            let _ = writeln!(out, "\t\t{}", work_unit);
        }
        let _ = writeln!(out, "\tExample Build Scans:");
        let (shown, hidden) = example_build_scans(container);
        for id in shown {
            let _ = writeln!(out, "\t\t{}", links::build_scan_url(server_url, id));
        }
        if hidden > 0 {
            let _ = writeln!(out, "\t\t+{} more", hidden);
        }
    }
    out
}
