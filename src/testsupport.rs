//! Shared test fixtures for pipeline, config, and credential tests.
//!
//! Fakes here stand in for the network and process collaborators so unit
//! tests stay deterministic.

use crate::api::ModelClient;
use crate::error::{ApiError, ExecError};
use crate::exec::{ExecOutput, ShellRunner};
use crate::pipeline::PipelineEvent;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::{mpsc, Notify};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "linuxai-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Model client that replays queued results in order.
pub struct FakeModelClient {
    replies: Mutex<VecDeque<Result<String, ApiError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModelClient {
    pub fn new(replies: Vec<Result<String, ApiError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Client whose every reply succeeds with the given texts.
    pub fn replying<const N: usize>(texts: [&str; N]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for FakeModelClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::InvalidResponse("no scripted reply".into())))
    }
}

/// Shell that returns a fixed output and records every command line.
pub struct ScriptedShell {
    output: ExecOutput,
    commands: Mutex<Vec<String>>,
}

impl ScriptedShell {
    pub fn new(output: ExecOutput) -> Self {
        Self {
            output,
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Exit 0 with the given stdout and no stderr.
    pub fn ok(stdout: &str) -> Self {
        Self::new(ExecOutput {
            exit_code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShellRunner for ScriptedShell {
    async fn run(&self, command_line: &str) -> Result<ExecOutput, ExecError> {
        self.commands.lock().unwrap().push(command_line.to_string());
        Ok(self.output.clone())
    }
}

/// Shell whose runs block until `release` is called.
pub struct GatedShell {
    calls: AtomicUsize,
    gate: Notify,
}

impl GatedShell {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            gate: Notify::new(),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ShellRunner for GatedShell {
    async fn run(&self, _command_line: &str) -> Result<ExecOutput, ExecError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(ExecOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

/// Shell whose `run` panics, as a buggy runner implementation would.
pub struct PanickingShell;

#[async_trait]
impl ShellRunner for PanickingShell {
    async fn run(&self, command_line: &str) -> Result<ExecOutput, ExecError> {
        panic!("runner blew up on {command_line}");
    }
}

/// Shell that fails every run with an error built from the program name.
pub struct FailingShell {
    make_error: Box<dyn Fn(String) -> ExecError + Send + Sync>,
}

impl FailingShell {
    pub fn new(make_error: impl Fn(String) -> ExecError + Send + Sync + 'static) -> Self {
        Self {
            make_error: Box::new(make_error),
        }
    }
}

#[async_trait]
impl ShellRunner for FailingShell {
    async fn run(&self, _command_line: &str) -> Result<ExecOutput, ExecError> {
        Err((self.make_error)("sh".to_string()))
    }
}

/// Collect events up to and including the first one matching `stop`.
pub async fn drain_until(
    rx: &mut mpsc::UnboundedReceiver<PipelineEvent>,
    stop: impl Fn(&PipelineEvent) -> bool,
) -> Vec<PipelineEvent> {
    let mut events = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for pipeline event")
            .expect("pipeline event channel closed");
        let done = stop(&event);
        events.push(event);
        if done {
            return events;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
    }

    #[tokio::test]
    async fn fake_client_replays_in_order_then_errors() {
        let client = FakeModelClient::replying(["a", "b"]);
        assert_eq!(client.generate("1").await.unwrap(), "a");
        assert_eq!(client.generate("2").await.unwrap(), "b");
        assert!(client.generate("3").await.is_err());
        assert_eq!(client.prompts(), vec!["1", "2", "3"]);
    }
}
