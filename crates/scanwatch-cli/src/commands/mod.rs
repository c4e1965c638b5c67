//! Command implementations.

pub mod builds;
pub mod instability;
pub mod profile;

pub use self::builds::execute_builds;
pub use self::instability::execute_tests;
pub use self::profile::execute_profile;

use crate::config::Config;
use crate::error::{CliError, Result};
use chrono::{DateTime, FixedOffset, Local, Timelike};
use scanwatch_sdk::{AccessKey, ApiClient};
use std::path::PathBuf;

/// Server connection after applying command-line overrides to the active profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Server URL
    pub server_url: String,

    /// File holding the access key
    pub access_key_file: PathBuf,

    /// Default project filter of the profile
    pub project_name: Option<String>,
}

impl Connection {
    /// Resolve the connection; flags win over the active profile.
    pub fn resolve(
        config: &Config,
        server_url: Option<String>,
        access_key_file: Option<PathBuf>,
    ) -> Result<Self> {
        let profile = config.get_active_profile().ok();

        let server_url = server_url
            .or_else(|| profile.map(|p| p.server_url.clone()))
            .ok_or_else(|| {
                CliError::Config(
                    "No server URL: pass --server-url or configure a profile".to_string(),
                )
            })?;
        let access_key_file = access_key_file
            .or_else(|| profile.and_then(|p| p.access_key_file.clone()))
            .ok_or_else(|| {
                CliError::Config(
                    "No access key file: pass --access-key-file or set one on the profile"
                        .to_string(),
                )
            })?;

        Ok(Self {
            server_url,
            access_key_file,
            project_name: profile.and_then(|p| p.project_name.clone()),
        })
    }

    /// Build an API client for this connection.
    pub fn client(&self) -> Result<ApiClient> {
        let key = AccessKey::from_file(&self.access_key_file)?;
        Ok(ApiClient::new(&self.server_url, key)?)
    }
}

/// Local wall-clock time truncated to whole seconds.
pub(crate) fn now() -> DateTime<FixedOffset> {
    let now = Local::now().fixed_offset();
    now.with_nanosecond(0).unwrap_or(now)
}
