//! Events emitted by `CommandPipeline` for the host to render.
//!
//! Events arrive in completion order. The host drains them on one task and is
//! the only writer of the transcript.

use super::candidate::{CandidateId, CandidateStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The model answered a prompt.
    AssistantText { text: String },
    /// The live candidate set was replaced by the commands of a new response.
    CandidatesReplaced { ids: Vec<CandidateId> },
    /// The model request failed; candidates are unchanged.
    ModelError { message: String },
    /// A submitted prompt completed, successfully or not.
    PromptFinished,
    /// Emitted synchronously from `execute` before the process is launched.
    Executing { id: CandidateId, command: String },
    /// Non-empty standard output of a finished command.
    CommandOutput { id: CandidateId, text: String },
    /// Non-empty standard error, or a launch failure naming the command.
    CommandError { id: CandidateId, text: String },
    /// Always the last event for one execution.
    CommandFinished {
        id: CandidateId,
        status: CandidateStatus,
        exit_code: Option<i32>,
    },
}

impl PipelineEvent {
    /// Candidate this event belongs to, if any.
    pub fn candidate_id(&self) -> Option<CandidateId> {
        match self {
            Self::Executing { id, .. }
            | Self::CommandOutput { id, .. }
            | Self::CommandError { id, .. }
            | Self::CommandFinished { id, .. } => Some(*id),
            Self::AssistantText { .. }
            | Self::CandidatesReplaced { .. }
            | Self::ModelError { .. }
            | Self::PromptFinished => None,
        }
    }
}
