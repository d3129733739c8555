//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};

/// Chat with a Gemini model and run the shell commands it suggests.
#[derive(Debug, Parser)]
#[command(name = "linuxai", version)]
pub struct Args {
    /// Prompt to send. If provided, runs in one-shot mode and exits.
    pub prompt: Option<String>,

    /// Path to config file (default: ./linuxai.toml or ~/.config/linuxai/linuxai.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Override the model name.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Override the API base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the stored API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum KeyAction {
    /// Validate and store a key. Prompts without echo when KEY is omitted.
    Set { key: Option<String> },
    /// Show whether a key is stored.
    Status,
    /// Delete the stored key.
    Clear,
}
