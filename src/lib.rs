//! LinuxAI: chat with a Gemini model and run the shell commands it suggests.
//!
//! The core is [`pipeline::CommandPipeline`]. It sends prompts through a
//! [`api::ModelClient`], extracts fenced code blocks from each response as
//! editable command candidates, and runs them through an
//! [`exec::ShellRunner`] on background tasks. Everything it learns is
//! reported as [`pipeline::PipelineEvent`]s for the host to render.
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use linuxai::api::GeminiClient;
//! use linuxai::config::load_config;
//! use linuxai::exec::LocalShell;
//! use linuxai::pipeline::{CommandPipeline, PipelineEvent};
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let client = GeminiClient::new(&config.api, "my-key");
//! let (pipeline, mut events) =
//!     CommandPipeline::new(Arc::new(client), Arc::new(LocalShell::default()));
//! pipeline.submit("How do I list open ports?");
//! while let Some(event) = events.recv().await {
//!     if event == PipelineEvent::PromptFinished {
//!         break;
//!     }
//! }
//! if let Some(first) = pipeline.candidates().first() {
//!     pipeline.execute(first.id).unwrap();
//! }
//! # }
//! ```

pub mod api;
pub mod clipboard;
pub mod config;
pub mod credentials;
pub mod error;
pub mod exec;
pub mod pipeline;
#[cfg(test)]
pub mod testsupport;
pub mod transcript;
pub mod types;
pub mod ui;
