//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`LINUXAI_API_KEY`, `LINUXAI_BASE_URL`,
//!    `LINUXAI_MODEL`, `LINUXAI_API_TIMEOUT_SECS`, `LINUXAI_SHELL`,
//!    `LINUXAI_KEY_FILE`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./linuxai.toml in the current directory
//! 4. $XDG_CONFIG_HOME/linuxai/linuxai.toml (or ~/.config/linuxai/linuxai.toml)
//! 5. Built-in defaults
//!
//! Only the first file found is read; files are not merged.

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

mod defaults;
mod env;
mod types;

use defaults::{APP_DIR_NAME, CONFIG_FILE_NAME, KEY_FILE_NAME};
pub use types::{ApiConfig, Config, DisplayConfig, ShellConfig};

/// Where the active configuration text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Local(PathBuf),
    Global(PathBuf),
    BuiltInDefaults,
}

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    let (config, source) = load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )?;
    debug!(?source, "configuration loaded");
    Ok(config)
}

fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<(Config, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (text, source) = read_config_text(path_override, &read_file, &config_root)?;
    let mut config: Config = toml::from_str(&text)?;
    env::apply_env_overrides(&mut config, &env_lookup)?;
    validate(&config)?;
    Ok((config, source))
}

fn read_config_text<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if let Ok(text) = read_file(&local) {
        return Ok((text, ConfigSource::Local(local)));
    }
    if let Some(dir) = config_root() {
        let global = dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME);
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "api.base_url must not be empty".to_string(),
        ));
    }
    if config.api.model.trim().is_empty() {
        return Err(ConfigError::Invalid("api.model must not be empty".to_string()));
    }
    if config.shell.program.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "shell.program must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Resolve the API key file path: explicit setting, else the config root.
pub fn key_file_path(config: &Config) -> Option<PathBuf> {
    key_file_path_with(config, config_root_dir)
}

fn key_file_path_with<FRoot>(config: &Config, config_root: FRoot) -> Option<PathBuf>
where
    FRoot: Fn() -> Option<PathBuf>,
{
    if let Some(path) = config
        .api
        .key_file
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        return Some(PathBuf::from(path));
    }
    config_root().map(|dir| dir.join(APP_DIR_NAME).join(KEY_FILE_NAME))
}

fn config_root_dir() -> Option<PathBuf> {
    dirs::config_dir()
}
