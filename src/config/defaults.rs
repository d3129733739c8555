//! Default configuration constants.

/// Directory name under the user config root.
pub(super) const APP_DIR_NAME: &str = "linuxai";
/// Config file name looked up locally and under the config root.
pub(super) const CONFIG_FILE_NAME: &str = "linuxai.toml";
/// File name of the stored API key.
pub(super) const KEY_FILE_NAME: &str = "api_key.json";
/// Gemini REST endpoint root.
pub(super) const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model queried when none is configured.
pub(super) const DEFAULT_MODEL: &str = "gemini-pro";
/// Default timeout for model API requests.
pub(super) const DEFAULT_API_TIMEOUT_SECS: u64 = 120;
/// Interpreter used for `<program> -c <command>`.
pub(super) const DEFAULT_SHELL: &str = "sh";
