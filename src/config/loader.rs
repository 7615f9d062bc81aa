use super::{MalformedRowPolicy, RollupConfig};
use crate::error::{ErrorCode, Result, RollupError};
use std::path::Path;
use tracing::debug;

pub const ENV_TIME_OFF_MARKER: &str = "TIMESHEET_TIME_OFF_MARKER";
pub const ENV_QUALIFYING_MARKER: &str = "TIMESHEET_QUALIFYING_MARKER";
pub const ENV_MALFORMED_POLICY: &str = "TIMESHEET_ON_MALFORMED_ROW";

/// Load configuration from an optional TOML file, apply `TIMESHEET_*`
/// environment overrides, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<RollupConfig> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<RollupConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => RollupConfig::default(),
    };

    config.merge_env_vars(env)?;
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<RollupConfig> {
    if !path.exists() {
        return Err(RollupError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("configuration file not found: {}", path.display()),
        ));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        RollupError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("cannot read {}", path.display()),
        )
        .with_source(e)
    })?;

    let config: RollupConfig = toml::from_str(&content).map_err(|e| {
        RollupError::config_with_code(
            ErrorCode::CONFIG_PARSE_ERROR,
            format!("invalid TOML in {}", path.display()),
        )
        .with_source(e)
    })?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

impl RollupConfig {
    /// Override fields from `TIMESHEET_*` environment variables.
    pub fn merge_env_vars<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(marker) = env(ENV_TIME_OFF_MARKER) {
            debug!("{ENV_TIME_OFF_MARKER} overrides time_off_marker");
            self.time_off_marker = marker;
        }
        if let Some(marker) = env(ENV_QUALIFYING_MARKER) {
            debug!("{ENV_QUALIFYING_MARKER} overrides qualifying_project_marker");
            self.qualifying_project_marker = marker;
        }
        if let Some(policy) = env(ENV_MALFORMED_POLICY) {
            self.on_malformed_row = policy.parse::<MalformedRowPolicy>()?;
        }
        Ok(())
    }
}
