//! Process-level setup: logging and API key resolution.

use linuxai::config::Config;
use linuxai::credentials::KeyStore;
use linuxai::ui::RenderSink;
use tracing_subscriber::EnvFilter;

/// Env var holding the log filter directive.
const LOG_ENV: &str = "LINUXAI_LOG";

/// Install the stderr log subscriber. Defaults to warnings only.
pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Pick the API key: config/env value first, then the key file.
///
/// A broken key file is reported and treated as "no key".
pub(crate) fn resolve_api_key(
    renderer: &dyn RenderSink,
    config: &Config,
    store: Option<&KeyStore>,
) -> Option<String> {
    if let Some(key) = config.api.inline_api_key() {
        return Some(key.to_string());
    }
    let store = store?;
    match store.load() {
        Ok(key) => key,
        Err(err) => {
            renderer.warn(&format!(
                "Error loading API key from {}: {err}",
                store.path().display()
            ));
            None
        }
    }
}
