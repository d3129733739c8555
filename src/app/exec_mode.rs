//! One-shot mode: send a single prompt, print the answer and its commands.

use crate::app::repl_loop::Host;
use linuxai::pipeline::PipelineEvent;
use tokio::sync::mpsc;

/// Submit `prompt`, render everything up to `PromptFinished`, and exit.
///
/// The prompt goes to the model verbatim, even when it starts with `/`.
/// Returns a process exit code: non-zero when nothing was sent or the model
/// request failed.
pub(crate) async fn run_exec_mode(
    mut host: Host<'_>,
    mut events: mpsc::UnboundedReceiver<PipelineEvent>,
    prompt: &str,
) -> i32 {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        host.renderer().error("prompt is empty");
        return 2;
    }
    if !host.submit_prompt(prompt) {
        return 1;
    }
    while host.prompt_in_flight() {
        let Some(event) = events.recv().await else {
            break;
        };
        host.handle_event(event);
    }
    if host.model_failures() > 0 {
        1
    } else {
        0
    }
}
