//! Command candidates and their execution status.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier for one extracted command.
///
/// Ids are never reused within a process, so an id from a discarded response
/// can not alias a candidate from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(u64);

impl CandidateId {
    /// Wrap a raw id value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for candidate ids.
#[derive(Debug, Default)]
pub struct CandidateIds {
    next: AtomicU64,
}

impl CandidateIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id.
    pub fn next_id(&self) -> CandidateId {
        CandidateId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// Lifecycle of one candidate: `Idle -> Running -> Succeeded | Failed`.
///
/// A finished candidate may be executed again, which moves it back to
/// `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Idle,
    Running,
    /// The shell was launched and ran to completion, whatever its exit code.
    Succeeded,
    /// The shell could not be launched at all.
    Failed,
}

impl CandidateStatus {
    pub fn is_running(self) -> bool {
        self == Self::Running
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Succeeded => "done",
            Self::Failed => "failed",
        }
    }
}

/// One shell command pulled out of an assistant response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCandidate {
    pub id: CandidateId,
    /// Command text exactly as extracted.
    pub raw_text: String,
    /// Text that will be executed or copied; free-form user edits land here.
    pub editable_text: String,
    pub status: CandidateStatus,
}

impl CommandCandidate {
    pub fn new(id: CandidateId, raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        Self {
            id,
            editable_text: raw_text.clone(),
            raw_text,
            status: CandidateStatus::Idle,
        }
    }

    /// True when the user changed the text since extraction.
    pub fn is_edited(&self) -> bool {
        self.raw_text != self.editable_text
    }
}
