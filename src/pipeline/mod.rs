//! Command extraction and execution pipeline.
//!
//! `CommandPipeline` turns a model response into a set of editable command
//! candidates and runs them on background tasks. All results come back as
//! [`PipelineEvent`]s on one channel; nothing from a background task is raised
//! to the caller directly.
//!
//! Only one response's candidates are live at a time. A new response replaces
//! the whole set, even while commands from the old set are still running.

mod candidate;
mod events;
mod extract;

pub use candidate::{CandidateId, CandidateIds, CandidateStatus, CommandCandidate};
pub use events::PipelineEvent;
pub use extract::{extract_candidates, extract_commands};

use crate::api::ModelClient;
use crate::clipboard::Clipboard;
use crate::error::PipelineError;
use crate::exec::ShellRunner;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type CandidateSet = Arc<Mutex<Vec<CommandCandidate>>>;

/// Orchestrates model queries and command executions for one conversation.
///
/// Cloning yields another handle onto the same candidate set and event stream.
#[derive(Clone)]
pub struct CommandPipeline {
    client: Arc<dyn ModelClient>,
    runner: Arc<dyn ShellRunner>,
    ids: Arc<CandidateIds>,
    candidates: CandidateSet,
    events: mpsc::UnboundedSender<PipelineEvent>,
}

impl CommandPipeline {
    /// Build a pipeline and the receiver the host drains for events.
    pub fn new(
        client: Arc<dyn ModelClient>,
        runner: Arc<dyn ShellRunner>,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pipeline = Self {
            client,
            runner,
            ids: Arc::new(CandidateIds::new()),
            candidates: Arc::new(Mutex::new(Vec::new())),
            events: tx,
        };
        (pipeline, rx)
    }

    /// Send a prompt to the model on a background task.
    ///
    /// Emits `AssistantText` + `CandidatesReplaced` or `ModelError`, then
    /// always `PromptFinished`.
    pub fn submit(&self, prompt: impl Into<String>) -> JoinHandle<()> {
        let prompt = prompt.into();
        let client = Arc::clone(&self.client);
        let ids = Arc::clone(&self.ids);
        let candidates = Arc::clone(&self.candidates);
        let events = self.events.clone();

        tokio::spawn(async move {
            debug!(chars = prompt.len(), "submitting prompt");
            match client.generate(&prompt).await {
                Ok(text) => {
                    let fresh = extract_candidates(&text, &ids);
                    let fresh_ids: Vec<CandidateId> = fresh.iter().map(|c| c.id).collect();
                    debug!(count = fresh_ids.len(), "extracted command candidates");
                    *lock(&candidates) = fresh;
                    send(&events, PipelineEvent::AssistantText { text });
                    send(&events, PipelineEvent::CandidatesReplaced { ids: fresh_ids });
                }
                Err(err) => {
                    warn!(error = %err, status = ?err.status_code(), "model request failed");
                    send(
                        &events,
                        PipelineEvent::ModelError {
                            message: err.to_string(),
                        },
                    );
                }
            }
            send(&events, PipelineEvent::PromptFinished);
        })
    }

    /// Snapshot of the live candidates in extraction order.
    pub fn candidates(&self) -> Vec<CommandCandidate> {
        lock(&self.candidates).clone()
    }

    pub fn candidate(&self, id: CandidateId) -> Option<CommandCandidate> {
        lock(&self.candidates).iter().find(|c| c.id == id).cloned()
    }

    /// Overwrite a candidate's editable text. The text is not validated.
    pub fn edit(&self, id: CandidateId, text: impl Into<String>) -> Result<(), PipelineError> {
        let mut set = lock(&self.candidates);
        let candidate = set
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(PipelineError::UnknownCandidate(id))?;
        candidate.editable_text = text.into();
        Ok(())
    }

    /// Hand the candidate's current text to the clipboard, verbatim.
    pub fn copy(&self, id: CandidateId, clipboard: &dyn Clipboard) -> Result<String, PipelineError> {
        let text = self
            .candidate(id)
            .ok_or(PipelineError::UnknownCandidate(id))?
            .editable_text;
        clipboard
            .set_text(&text)
            .map_err(PipelineError::Clipboard)?;
        Ok(text)
    }

    /// Launch the candidate's current text through the shell runner.
    ///
    /// Rejected without side effects when the candidate is already running.
    /// `Executing` is emitted before this returns; the remaining events come
    /// from the spawned task, ending with `CommandFinished`.
    pub fn execute(&self, id: CandidateId) -> Result<JoinHandle<()>, PipelineError> {
        let command = {
            let mut set = lock(&self.candidates);
            let candidate = set
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(PipelineError::UnknownCandidate(id))?;
            if candidate.status.is_running() {
                return Err(PipelineError::AlreadyRunning(id));
            }
            candidate.status = CandidateStatus::Running;
            candidate.editable_text.clone()
        };
        send(
            &self.events,
            PipelineEvent::Executing {
                id,
                command: command.clone(),
            },
        );

        let runner = Arc::clone(&self.runner);
        let candidates = Arc::clone(&self.candidates);
        let events = self.events.clone();
        Ok(tokio::spawn(async move {
            // A panicking runner must still leave the candidate terminal.
            let run = {
                let command = command.clone();
                tokio::spawn(async move { runner.run(&command).await })
            };
            let (status, exit_code) = match run.await {
                Ok(Ok(output)) => {
                    debug!(%id, success = output.success(), "command exited");
                    if !output.stdout.is_empty() {
                        send(
                            &events,
                            PipelineEvent::CommandOutput {
                                id,
                                text: output.stdout.trim_end().to_string(),
                            },
                        );
                    }
                    if !output.stderr.is_empty() {
                        send(
                            &events,
                            PipelineEvent::CommandError {
                                id,
                                text: output.stderr,
                            },
                        );
                    }
                    (CandidateStatus::Succeeded, output.exit_code)
                }
                Ok(Err(err)) => {
                    warn!(%id, error = %err, "command launch failed");
                    send(
                        &events,
                        PipelineEvent::CommandError {
                            id,
                            text: format!("{command}: {err}"),
                        },
                    );
                    (CandidateStatus::Failed, None)
                }
                Err(join_err) => {
                    warn!(%id, error = %join_err, "shell runner aborted");
                    send(
                        &events,
                        PipelineEvent::CommandError {
                            id,
                            text: format!("{command}: shell runner aborted: {join_err}"),
                        },
                    );
                    (CandidateStatus::Failed, None)
                }
            };

            // The set may have been replaced while the command ran.
            if let Some(candidate) = lock(&candidates).iter_mut().find(|c| c.id == id) {
                candidate.status = status;
            }
            send(
                &events,
                PipelineEvent::CommandFinished {
                    id,
                    status,
                    exit_code,
                },
            );
        }))
    }
}

fn lock(candidates: &CandidateSet) -> MutexGuard<'_, Vec<CommandCandidate>> {
    candidates.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn send(events: &mpsc::UnboundedSender<PipelineEvent>, event: PipelineEvent) {
    if events.send(event).is_err() {
        debug!("pipeline event dropped: receiver closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::clipboard::Clipboard;
    use crate::error::ApiError;
    use crate::exec::ExecOutput;
    use crate::error::{ClipboardError, ExecError};
    use crate::testsupport::{
        drain_until, FailingShell, FakeModelClient, GatedShell, PanickingShell, ScriptedShell,
    };

    fn pipeline_with(
        client: FakeModelClient,
        shell: Arc<dyn ShellRunner>,
    ) -> (CommandPipeline, mpsc::UnboundedReceiver<PipelineEvent>) {
        CommandPipeline::new(Arc::new(client), shell)
    }

    #[tokio::test]
    async fn submit_replaces_candidates_and_emits_text() {
        let client = FakeModelClient::replying(["Try:\n```bash\nls -la\n```\n```\necho hi\n```"]);
        let (pipeline, mut rx) = pipeline_with(client, Arc::new(ScriptedShell::ok("")));
        pipeline.submit("list files").await.unwrap();

        let events = drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        assert!(matches!(events[0], PipelineEvent::AssistantText { .. }));
        let PipelineEvent::CandidatesReplaced { ids } = &events[1] else {
            panic!("expected CandidatesReplaced, got {:?}", events[1]);
        };
        let texts: Vec<String> = pipeline
            .candidates()
            .into_iter()
            .map(|c| c.editable_text)
            .collect();
        assert_eq!(texts, vec!["ls -la", "echo hi"]);
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn model_failure_keeps_previous_candidates() {
        let client = FakeModelClient::new(vec![
            Ok("```pwd```".to_string()),
            Err(ApiError::Status {
                code: 429,
                body: "quota".into(),
            }),
        ]);
        let (pipeline, mut rx) = pipeline_with(client, Arc::new(ScriptedShell::ok("")));
        pipeline.submit("first").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let before = pipeline.candidates();

        pipeline.submit("second").await.unwrap();
        let events = drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        assert!(matches!(
            &events[0],
            PipelineEvent::ModelError { message } if message.contains("quota")
        ));
        assert_eq!(pipeline.candidates(), before);
    }

    #[tokio::test]
    async fn edit_changes_text_that_is_executed_and_copied() {
        let client = FakeModelClient::replying(["```bash\necho one\n```"]);
        let shell = Arc::new(ScriptedShell::ok("two\n"));
        let (pipeline, mut rx) = pipeline_with(client, shell.clone());
        pipeline.submit("x").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;

        let id = pipeline.candidates()[0].id;
        pipeline.edit(id, "echo two").unwrap();

        let clipboard = MemoryClipboard::new();
        assert_eq!(pipeline.copy(id, &clipboard).unwrap(), "echo two");
        assert_eq!(clipboard.contents().as_deref(), Some("echo two"));
        assert_eq!(pipeline.candidate(id).unwrap().status, CandidateStatus::Idle);

        pipeline.execute(id).unwrap().await.unwrap();
        assert_eq!(shell.commands(), vec!["echo two".to_string()]);
        let candidate = pipeline.candidate(id).unwrap();
        assert_eq!(candidate.raw_text, "echo one");
        assert_eq!(candidate.status, CandidateStatus::Succeeded);
    }

    #[tokio::test]
    async fn unknown_ids_are_rejected() {
        let (pipeline, _rx) = pipeline_with(FakeModelClient::new(vec![]), Arc::new(ScriptedShell::ok("")));
        let id = CandidateId::from_raw(99);
        assert_eq!(pipeline.edit(id, "ls"), Err(PipelineError::UnknownCandidate(id)));
        assert!(matches!(
            pipeline.execute(id),
            Err(PipelineError::UnknownCandidate(_))
        ));
        let clipboard = MemoryClipboard::new();
        assert!(pipeline.copy(id, &clipboard).is_err());
    }

    #[tokio::test]
    async fn execute_while_running_is_rejected() {
        let client = FakeModelClient::replying(["```sleep 100```"]);
        let shell = Arc::new(GatedShell::new());
        let (pipeline, mut rx) = pipeline_with(client, shell.clone());
        pipeline.submit("x").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let id = pipeline.candidates()[0].id;

        let handle = pipeline.execute(id).unwrap();
        assert_eq!(pipeline.execute(id).unwrap_err(), PipelineError::AlreadyRunning(id));
        assert_eq!(pipeline.candidate(id).unwrap().status, CandidateStatus::Running);

        shell.release();
        handle.await.unwrap();
        assert_eq!(shell.calls(), 1);
        assert_eq!(pipeline.candidate(id).unwrap().status, CandidateStatus::Succeeded);
    }

    #[tokio::test]
    async fn stdout_and_stderr_are_independent_events() {
        let client = FakeModelClient::replying(["```make```"]);
        let shell = Arc::new(ScriptedShell::new(ExecOutput {
            exit_code: Some(2),
            stdout: "partial\n".into(),
            stderr: "make: *** Error 1\n".into(),
        }));
        let (pipeline, mut rx) = pipeline_with(client, shell);
        pipeline.submit("x").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let id = pipeline.candidates()[0].id;

        pipeline.execute(id).unwrap();
        let events = drain_until(&mut rx, |e| {
            matches!(e, PipelineEvent::CommandFinished { .. })
        })
        .await;
        assert_eq!(
            events,
            vec![
                PipelineEvent::Executing {
                    id,
                    command: "make".into()
                },
                PipelineEvent::CommandOutput {
                    id,
                    text: "partial".into()
                },
                PipelineEvent::CommandError {
                    id,
                    text: "make: *** Error 1\n".into()
                },
                PipelineEvent::CommandFinished {
                    id,
                    status: CandidateStatus::Succeeded,
                    exit_code: Some(2)
                },
            ]
        );
    }

    #[tokio::test]
    async fn new_response_discards_running_candidate_without_touching_new_set() {
        let client = FakeModelClient::replying(["```sleep 1```", "```uptime```"]);
        let shell = Arc::new(GatedShell::new());
        let (pipeline, mut rx) = pipeline_with(client, shell.clone());
        pipeline.submit("a").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let old = pipeline.candidates()[0].id;
        let handle = pipeline.execute(old).unwrap();

        pipeline.submit("b").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        shell.release();
        handle.await.unwrap();

        let events = drain_until(&mut rx, |e| {
            matches!(e, PipelineEvent::CommandFinished { .. })
        })
        .await;
        assert_eq!(events.last().and_then(PipelineEvent::candidate_id), Some(old));
        let live = pipeline.candidates();
        assert_eq!(live.len(), 1);
        assert_ne!(live[0].id, old);
        assert_eq!(live[0].status, CandidateStatus::Idle);
    }

    #[tokio::test]
    async fn panicking_runner_ends_failed_and_can_run_again() {
        let client = FakeModelClient::replying(["```reboot```"]);
        let (pipeline, mut rx) = pipeline_with(client, Arc::new(PanickingShell));
        pipeline.submit("x").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let id = pipeline.candidates()[0].id;

        pipeline.execute(id).unwrap().await.unwrap();
        let events = drain_until(&mut rx, |e| {
            matches!(e, PipelineEvent::CommandFinished { .. })
        })
        .await;
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::CommandError { text, .. } if text.starts_with("reboot: shell runner aborted")
        )));
        assert_eq!(
            events.last(),
            Some(&PipelineEvent::CommandFinished {
                id,
                status: CandidateStatus::Failed,
                exit_code: None
            })
        );
        assert_eq!(pipeline.candidate(id).unwrap().status, CandidateStatus::Failed);
        assert!(pipeline.execute(id).is_ok());
    }

    #[tokio::test]
    async fn collection_failure_after_spawn_counts_as_failed() {
        let client = FakeModelClient::replying(["```cat big.log```"]);
        let shell = FailingShell::new(|program| ExecError::Wait {
            program,
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"),
        });
        let (pipeline, mut rx) = pipeline_with(client, Arc::new(shell));
        pipeline.submit("x").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let id = pipeline.candidates()[0].id;

        pipeline.execute(id).unwrap().await.unwrap();
        let events = drain_until(&mut rx, |e| {
            matches!(e, PipelineEvent::CommandFinished { .. })
        })
        .await;
        assert!(events.iter().any(|e| matches!(
            e,
            PipelineEvent::CommandError { text, .. } if text.contains("pipe closed")
        )));
        assert_eq!(pipeline.candidate(id).unwrap().status, CandidateStatus::Failed);
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn set_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".into()))
        }
    }

    #[tokio::test]
    async fn clipboard_failure_is_reported_and_leaves_status() {
        let client = FakeModelClient::replying(["```ls```"]);
        let (pipeline, mut rx) = pipeline_with(client, Arc::new(ScriptedShell::ok("")));
        pipeline.submit("x").await.unwrap();
        drain_until(&mut rx, |e| *e == PipelineEvent::PromptFinished).await;
        let id = pipeline.candidates()[0].id;

        assert_eq!(
            pipeline.copy(id, &BrokenClipboard),
            Err(PipelineError::Clipboard(ClipboardError::Unavailable(
                "no display".into()
            )))
        );
        assert_eq!(pipeline.candidate(id).unwrap().status, CandidateStatus::Idle);
    }
}
