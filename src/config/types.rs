//! Configuration data model.
//!
//! Struct definitions and their defaults only. Source precedence and env
//! handling stay in `config::mod` and `config::env`.

use serde::Deserialize;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_MODEL, DEFAULT_SHELL,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub shell: ShellConfig,
    pub display: DisplayConfig,
}

/// Model API settings under `[api]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Inline key. Usually left empty in favor of the key file or env var.
    pub api_key: Option<String>,
    /// Override for the stored-key location.
    pub key_file: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            api_key: None,
            key_file: None,
        }
    }
}

impl ApiConfig {
    /// Inline or env-provided key, ignoring blank values.
    pub fn inline_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Command execution settings under `[shell]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Interpreter invoked as `<program> -c <command line>`.
    pub program: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_SHELL.into(),
        }
    }
}

/// Terminal output settings under `[display]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}
