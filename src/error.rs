//! Unified error types for the pipeline and its collaborators.

use std::fmt;

use crate::pipeline::CandidateId;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors from the model API layer. Surfaced verbatim, never retried.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error.
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status { code: u16, body: String },
    /// 2xx response that carried no usable text.
    InvalidResponse(String),
    /// No API key was configured for the client.
    MissingApiKey,
}

impl ApiError {
    /// HTTP status code for status-class failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            Self::MissingApiKey => write!(f, "no API key configured"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

// ---------------------------------------------------------------------------
// CredentialError
// ---------------------------------------------------------------------------

/// Errors from the API-key file store.
#[derive(Debug)]
pub enum CredentialError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Key failed the format check; message says why.
    InvalidKey(String),
    /// No usable location for the key file.
    NoKeyPath,
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::InvalidKey(msg) => write!(f, "invalid API key: {msg}"),
            Self::NoKeyPath => write!(f, "could not determine API key file location"),
        }
    }
}

impl std::error::Error for CredentialError {}

impl From<std::io::Error> for CredentialError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CredentialError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// ExecError
// ---------------------------------------------------------------------------

/// Launch-level failures from the process execution collaborator.
///
/// A process that starts and then fails is not an `ExecError`; its stderr and
/// exit status are reported through the normal output path.
#[derive(Debug)]
pub enum ExecError {
    Spawn { program: String, source: std::io::Error },
    Wait { program: String, source: std::io::Error },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "failed to spawn {program}: {source}"),
            Self::Wait { program, source } => write!(f, "failed to collect {program}: {source}"),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } | Self::Wait { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// ClipboardError
// ---------------------------------------------------------------------------

/// Failures from a clipboard collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display).
    Unavailable(String),
    /// The clipboard was open but refused the text.
    Write(String),
    /// A previous holder of the clipboard lock panicked.
    Poisoned,
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "clipboard unavailable: {msg}"),
            Self::Write(msg) => write!(f, "clipboard write failed: {msg}"),
            Self::Poisoned => write!(f, "clipboard lock poisoned"),
        }
    }
}

impl std::error::Error for ClipboardError {}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Synchronous rejections from `CommandPipeline` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The id is not part of the live candidate set.
    UnknownCandidate(CandidateId),
    /// The candidate already has a process in flight.
    AlreadyRunning(CandidateId),
    /// The clipboard collaborator refused the text.
    Clipboard(ClipboardError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCandidate(id) => write!(f, "unknown command {id}"),
            Self::AlreadyRunning(id) => write!(f, "command {id} is already running"),
            Self::Clipboard(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<ClipboardError> for PipelineError {
    fn from(e: ClipboardError) -> Self {
        Self::Clipboard(e)
    }
}
