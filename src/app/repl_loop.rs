//! Interactive host loop.
//!
//! `Host` is the single owner of the transcript: user input and pipeline
//! events are both handled on the loop task, so appends never interleave.

use crate::app::commands::{parse_command_number, parse_slash_command, SlashCommandAction, SLASH_COMMANDS};
use linuxai::clipboard::Clipboard;
use linuxai::pipeline::{CandidateId, CommandPipeline, PipelineEvent};
use linuxai::transcript::Transcript;
use linuxai::ui::RenderSink;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Quit,
}

pub(crate) struct Host<'a> {
    pipeline: CommandPipeline,
    transcript: Transcript,
    renderer: &'a dyn RenderSink,
    clipboard: &'a dyn Clipboard,
    has_api_key: bool,
    prompt_in_flight: bool,
    model_failures: usize,
}

impl<'a> Host<'a> {
    pub(crate) fn new(
        pipeline: CommandPipeline,
        renderer: &'a dyn RenderSink,
        clipboard: &'a dyn Clipboard,
        has_api_key: bool,
    ) -> Self {
        Self {
            pipeline,
            transcript: Transcript::new(),
            renderer,
            clipboard,
            has_api_key,
            prompt_in_flight: false,
            model_failures: 0,
        }
    }

    pub(crate) fn prompt_in_flight(&self) -> bool {
        self.prompt_in_flight
    }

    pub(crate) fn model_failures(&self) -> usize {
        self.model_failures
    }

    pub(crate) fn renderer(&self) -> &'a dyn RenderSink {
        self.renderer
    }

    #[cfg(test)]
    pub(crate) fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Handle one line of user input.
    pub(crate) fn handle_line(&mut self, line: &str) -> LoopControl {
        let line = line.trim();
        if line.is_empty() {
            return LoopControl::Continue;
        }
        match parse_slash_command(line) {
            None => self.send_prompt(line),
            Some(action) => return self.handle_slash(action),
        }
        LoopControl::Continue
    }

    fn send_prompt(&mut self, prompt: &str) {
        self.submit_prompt(prompt);
    }

    /// Send `prompt` to the model as-is, without slash-command parsing.
    ///
    /// Returns whether a request was actually started.
    pub(crate) fn submit_prompt(&mut self, prompt: &str) -> bool {
        if !self.has_api_key {
            self.renderer
                .warn("Please set up your API key first! Run `linuxai key set`.");
            return false;
        }
        if self.prompt_in_flight {
            self.renderer
                .notice("Still waiting for the previous response; try again when it arrives.");
            return false;
        }
        self.transcript.push_user(prompt);
        self.prompt_in_flight = true;
        // The task reports back through the event channel.
        drop(self.pipeline.submit(prompt));
        self.renderer.notice("Processing...");
        true
    }

    fn handle_slash(&mut self, action: SlashCommandAction) -> LoopControl {
        match action {
            SlashCommandAction::Quit => return LoopControl::Quit,
            SlashCommandAction::Help => {
                for command in SLASH_COMMANDS {
                    self.renderer
                        .notice(&format!("{:<9} {}", command.name, command.description));
                }
            }
            SlashCommandAction::List => self.renderer.candidates(&self.pipeline.candidates()),
            SlashCommandAction::History => {
                for turn in self.transcript.turns() {
                    self.renderer.turn(turn);
                }
            }
            SlashCommandAction::Run(number) => {
                let Some(id) = self.resolve(number.as_deref(), "/run <n>") else {
                    return LoopControl::Continue;
                };
                if let Err(err) = self.pipeline.execute(id) {
                    self.renderer.warn(&err.to_string());
                }
            }
            SlashCommandAction::Edit { number, text } => {
                let Some(id) = self.resolve(number.as_deref(), "/edit <n> <command>") else {
                    return LoopControl::Continue;
                };
                let Some(text) = text else {
                    self.renderer.warn("Usage: /edit <n> <command>");
                    return LoopControl::Continue;
                };
                match self.pipeline.edit(id, text) {
                    Ok(()) => self.renderer.candidates(&self.pipeline.candidates()),
                    Err(err) => self.renderer.warn(&err.to_string()),
                }
            }
            SlashCommandAction::Copy(number) => {
                let Some(id) = self.resolve(number.as_deref(), "/copy <n>") else {
                    return LoopControl::Continue;
                };
                match self.pipeline.copy(id, self.clipboard) {
                    Ok(_) => self.renderer.notice("Command copied to clipboard!"),
                    Err(err) => self.renderer.error(&err.to_string()),
                }
            }
            SlashCommandAction::Unknown(name) => {
                self.renderer
                    .warn(&format!("Unknown command `{name}`. Type /help for a list."));
            }
        }
        LoopControl::Continue
    }

    fn resolve(&self, number: Option<&str>, usage: &str) -> Option<CandidateId> {
        let candidates = self.pipeline.candidates();
        match parse_command_number(number, candidates.len()) {
            Ok(index) => Some(candidates[index].id),
            Err(msg) => {
                self.renderer.warn(&format!("{msg}. Usage: {usage}"));
                None
            }
        }
    }

    /// Record and render one pipeline event.
    pub(crate) fn handle_event(&mut self, event: PipelineEvent) {
        debug!(?event, "pipeline event");
        self.transcript.apply(&event);
        match event {
            PipelineEvent::AssistantText { text } => self.renderer.assistant_message(&text),
            PipelineEvent::CandidatesReplaced { ids } => {
                if !ids.is_empty() {
                    self.renderer.candidates(&self.pipeline.candidates());
                }
            }
            PipelineEvent::ModelError { message } => {
                self.model_failures += 1;
                self.renderer.error(&message);
            }
            PipelineEvent::PromptFinished => self.prompt_in_flight = false,
            PipelineEvent::Executing { command, .. } => self.renderer.executing(&command),
            PipelineEvent::CommandOutput { text, .. } => self.renderer.command_output(&text),
            PipelineEvent::CommandError { text, .. } => self.renderer.command_error(&text),
            PipelineEvent::CommandFinished {
                id,
                status,
                exit_code,
            } => {
                let number = self
                    .pipeline
                    .candidates()
                    .iter()
                    .position(|c| c.id == id)
                    .map(|index| index + 1);
                self.renderer.command_finished(number, status, exit_code);
            }
        }
    }
}

/// Run the interactive loop until `/quit` or end of input.
pub(crate) async fn run_repl(
    mut host: Host<'_>,
    mut events: mpsc::UnboundedReceiver<PipelineEvent>,
    renderer: &dyn RenderSink,
) -> i32 {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    renderer.prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if host.handle_line(&line) == LoopControl::Quit {
                        return 0;
                    }
                    renderer.prompt();
                }
                Ok(None) => return 0,
                Err(err) => {
                    renderer.error(&format!("failed to read input: {err}"));
                    return 1;
                }
            },
            Some(event) = events.recv() => {
                let redraw = matches!(
                    event,
                    PipelineEvent::PromptFinished | PipelineEvent::CommandFinished { .. }
                );
                host.handle_event(event);
                if redraw {
                    renderer.prompt();
                }
            }
        }
    }
}
