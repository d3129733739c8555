//! Top-level dispatch for the `linuxai` binary.

use crate::app::exec_mode::run_exec_mode;
use crate::app::key::run_key_command;
use crate::app::repl_loop::{run_repl, Host};
use crate::app::startup::resolve_api_key;
use crate::cli::{Args, Command};
use linuxai::api::GeminiClient;
use linuxai::clipboard::SystemClipboard;
use linuxai::config::{key_file_path, load_config};
use linuxai::credentials::KeyStore;
use linuxai::exec::LocalShell;
use linuxai::pipeline::CommandPipeline;
use linuxai::ui::{RenderSink, Renderer};
use std::sync::Arc;
use tracing::debug;

/// Run the CLI and return the process exit code.
pub(crate) async fn run(args: Args) -> i32 {
    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            Renderer::new(!args.no_color).error(&err.to_string());
            return 1;
        }
    };

    // Apply CLI overrides.
    if let Some(model) = &args.model {
        config.api.model = model.clone();
    }
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }
    if args.no_color {
        config.display.color = false;
    }
    let renderer = Renderer::new(config.display.color);

    let store = key_file_path(&config).map(KeyStore::new);

    if let Some(Command::Key { action }) = &args.command {
        let Some(store) = store.as_ref() else {
            renderer.error("could not determine where to store the API key; set api.key_file");
            return 1;
        };
        return run_key_command(&renderer, store, action);
    }

    let api_key = resolve_api_key(&renderer, &config, store.as_ref());
    let has_api_key = api_key.is_some();
    let client = GeminiClient::new(&config.api, api_key.unwrap_or_default());
    let model = client.model().to_string();
    let shell = LocalShell::new(config.shell.program.clone());
    debug!(%model, shell = shell.program(), "starting pipeline");
    let (pipeline, events) = CommandPipeline::new(Arc::new(client), Arc::new(shell));
    let clipboard = SystemClipboard::new();
    let host = Host::new(pipeline, &renderer, &clipboard, has_api_key);

    match args.prompt.as_deref() {
        Some(prompt) => {
            if !has_api_key {
                renderer.error("Please set up your API key first! Run `linuxai key set`.");
                return 1;
            }
            run_exec_mode(host, events, prompt).await
        }
        None => {
            renderer.banner(&model);
            if !has_api_key {
                renderer.warn("API key: not set. Run `linuxai key set` or set LINUXAI_API_KEY.");
            }
            run_repl(host, events, &renderer).await
        }
    }
}
