//! Reporters for newly unstable test containers.

pub mod github;
pub mod standard;

pub use github::GitHubCliReporter;
pub use standard::render_standard;

use scanwatch_domain::TestEntity;

/// Example build scans listed per container before the rest are summarised
pub const MAX_BUILD_SCANS_TO_SHOW: usize = 5;

/// `name (🔴 failed: .., 🟡 flaky: .., 💯 total: ..)`
pub(crate) fn with_distribution(entity: &TestEntity) -> String {
    format!("{} ({})", entity.name, entity.outcome_distribution)
}

/// The shown example build scan IDs and how many were left out
pub(crate) fn example_build_scans(container: &TestEntity) -> (Vec<&str>, usize) {
    let ids = container.unstable_build_scan_ids();
    let hidden = ids.len().saturating_sub(MAX_BUILD_SCANS_TO_SHOW);
    let shown = ids.into_iter().take(MAX_BUILD_SCANS_TO_SHOW).collect();
    (shown, hidden)
}
