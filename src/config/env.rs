//! Environment variable overrides.
//!
//! `LINUXAI_*` variables win over every file-based setting.

use crate::error::ConfigError;

use super::Config;

pub(super) const ENV_API_KEY: &str = "LINUXAI_API_KEY";
pub(super) const ENV_BASE_URL: &str = "LINUXAI_BASE_URL";
pub(super) const ENV_MODEL: &str = "LINUXAI_MODEL";
pub(super) const ENV_API_TIMEOUT_SECS: &str = "LINUXAI_API_TIMEOUT_SECS";
pub(super) const ENV_SHELL: &str = "LINUXAI_SHELL";
pub(super) const ENV_KEY_FILE: &str = "LINUXAI_KEY_FILE";

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_empty(env_lookup, ENV_API_KEY) {
        config.api.api_key = Some(key);
    }
    if let Some(url) = non_empty(env_lookup, ENV_BASE_URL) {
        config.api.base_url = url;
    }
    if let Some(model) = non_empty(env_lookup, ENV_MODEL) {
        config.api.model = model;
    }
    if let Some(timeout) = non_empty(env_lookup, ENV_API_TIMEOUT_SECS) {
        let parsed = timeout.parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid {ENV_API_TIMEOUT_SECS} value `{timeout}`: expected positive integer seconds"
            ))
        })?;
        // Zero would mean an instant timeout, not "no timeout".
        config.api.timeout_secs = parsed.max(1);
    }
    if let Some(program) = non_empty(env_lookup, ENV_SHELL) {
        config.shell.program = program;
    }
    if let Some(path) = non_empty(env_lookup, ENV_KEY_FILE) {
        config.api.key_file = Some(path);
    }
    Ok(())
}

fn non_empty<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
