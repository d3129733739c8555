//! Append-only conversation log.
//!
//! The transcript has exactly one writer: the task that drains pipeline
//! events. Turns are never edited or removed once appended.

use crate::pipeline::PipelineEvent;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Synthetic turns recording command executions and their output.
    Shell,
    /// Synthetic turns for failures that are not command output.
    System,
}

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub ts_unix_ms: u64,
}

impl ChatTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            ts_unix_ms: now_unix_millis(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatTurn {
        self.push(ChatTurn::new(Role::User, text))
    }

    /// Record the turn an event produces, if it produces one.
    pub fn apply(&mut self, event: &PipelineEvent) -> Option<&ChatTurn> {
        let turn = match event {
            PipelineEvent::AssistantText { text } => ChatTurn::new(Role::Assistant, text.clone()),
            PipelineEvent::ModelError { message } => {
                ChatTurn::new(Role::System, format!("Error: {message}"))
            }
            PipelineEvent::Executing { command, .. } => {
                ChatTurn::new(Role::Shell, format!("> Executing: {command}"))
            }
            PipelineEvent::CommandOutput { text, .. } => {
                ChatTurn::new(Role::Shell, format!("Output:\n{text}"))
            }
            PipelineEvent::CommandError { text, .. } => {
                ChatTurn::new(Role::Shell, format!("Error:\n{text}"))
            }
            PipelineEvent::CandidatesReplaced { .. }
            | PipelineEvent::PromptFinished
            | PipelineEvent::CommandFinished { .. } => return None,
        };
        Some(self.push(turn))
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push(&mut self, turn: ChatTurn) -> &ChatTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|delta| delta.as_millis() as u64)
        .unwrap_or(0)
}
