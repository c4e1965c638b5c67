//! Links into the server web UI.

use chrono::{DateTime, Duration, FixedOffset};

/// Time range covered by a tests dashboard link
const DASHBOARD_LOOKBACK_DAYS: i64 = 7;

/// Link to the build scan of `build_id`
pub fn build_scan_url(server_url: &str, build_id: &str) -> String {
    format!("{}/s/{}", server_url.trim_end_matches('/'), build_id)
}

/// Link to the tests dashboard for one container over the week before `now`
pub fn tests_dashboard_url(
    server_url: &str,
    container: &str,
    now: DateTime<FixedOffset>,
) -> String {
    let end = now.timestamp_millis();
    let start = (now - Duration::days(DASHBOARD_LOOKBACK_DAYS)).timestamp_millis();
    format!(
        "{}/scans/tests?search.startTimeMax={}&search.startTimeMin={}&tests.container={}",
        server_url.trim_end_matches('/'),
        end,
        start,
        container
    )
}
