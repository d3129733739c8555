//! Rendering contract and the default terminal renderer.
//!
//! `RenderSink` is what the host loop talks to; tests substitute a recording
//! sink. `Renderer` writes assistant text and command output to stdout and
//! everything else to stderr.

use crate::pipeline::{CandidateStatus, CommandCandidate};
use crate::transcript::{ChatTurn, Role};
use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

const LABEL_ERROR: &str = "error:";
const LABEL_WARNING: &str = "warning:";
const INDENT: &str = "  ";

fn color_accent() -> Color {
    Color::Rgb { r: 0xF7, g: 0xB6, b: 0x4B }
}

fn color_primary() -> Color {
    Color::Rgb { r: 0x2F, g: 0x81, b: 0xF7 }
}

fn color_error() -> Color {
    Color::Rgb { r: 0xF8, g: 0x51, b: 0x49 }
}

fn color_success() -> Color {
    Color::Rgb { r: 0x3F, g: 0xB9, b: 0x50 }
}

fn color_muted() -> Color {
    Color::Rgb { r: 0x8B, g: 0x94, b: 0x9E }
}

/// Injectable rendering interface used by the host loop.
pub trait RenderSink: Send + Sync {
    /// Welcome text shown when the interactive loop starts.
    fn banner(&self, model: &str);
    /// Input prompt chrome.
    fn prompt(&self);
    fn assistant_message(&self, text: &str);
    /// Numbered list of the live command candidates (1-based).
    fn candidates(&self, candidates: &[CommandCandidate]);
    fn executing(&self, command: &str);
    fn command_output(&self, text: &str);
    fn command_error(&self, text: &str);
    fn command_finished(
        &self,
        number: Option<usize>,
        status: CandidateStatus,
        exit_code: Option<i32>,
    );
    /// One transcript entry, for history replay.
    fn turn(&self, turn: &ChatTurn);
    fn notice(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Default terminal renderer.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn label(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn tint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl RenderSink for Renderer {
    fn banner(&self, model: &str) {
        eprintln!("{}", self.label("Welcome to LinuxAI", color_accent()));
        eprintln!("{INDENT}model: {model}");
        eprintln!("{INDENT}Type a message to chat. Suggested commands are listed with numbers;");
        eprintln!("{INDENT}use /run <n>, /edit <n> <text>, /copy <n>. /help lists everything.");
    }

    fn prompt(&self) {
        eprint!("{} ", self.label("you>", color_primary()));
        let _ = io::stderr().flush();
    }

    fn assistant_message(&self, text: &str) {
        println!("{}", self.label("AI:", color_accent()));
        println!("{text}");
        let _ = io::stdout().flush();
    }

    fn candidates(&self, candidates: &[CommandCandidate]) {
        if candidates.is_empty() {
            eprintln!("{}", self.tint("(no commands)", color_muted()));
            return;
        }
        eprintln!("{}", self.label("Commands:", color_accent()));
        for (index, candidate) in candidates.iter().enumerate() {
            let mut lines = candidate.editable_text.lines();
            let first = lines.next().unwrap_or_default();
            let mut marker = format!("[{}]", candidate.status.label());
            if candidate.is_edited() {
                marker.push_str(" (edited)");
            }
            eprintln!(
                "{INDENT}{} {first} {}",
                self.label(&format!("{}.", index + 1), color_primary()),
                self.tint(&marker, color_muted())
            );
            for line in lines {
                eprintln!("{INDENT}   {line}");
            }
        }
    }

    fn executing(&self, command: &str) {
        eprintln!("{} {command}", self.label("> Executing:", color_accent()));
    }

    fn command_output(&self, text: &str) {
        println!("{}", self.label("Output:", color_success()));
        println!("{text}");
        let _ = io::stdout().flush();
    }

    fn command_error(&self, text: &str) {
        eprintln!("{}", self.label("Error:", color_error()));
        eprintln!("{}", text.trim_end());
    }

    fn command_finished(
        &self,
        number: Option<usize>,
        status: CandidateStatus,
        exit_code: Option<i32>,
    ) {
        let which = number
            .map(|n| format!("command {n}"))
            .unwrap_or_else(|| "earlier command".to_string());
        let exit = match exit_code {
            Some(code) => format!("exit {code}"),
            None if status == CandidateStatus::Failed => "not started".to_string(),
            None => "terminated by signal".to_string(),
        };
        let color = if exit_code == Some(0) {
            color_success()
        } else {
            color_muted()
        };
        eprintln!("{}", self.tint(&format!("{which} finished ({exit})"), color));
    }

    fn turn(&self, turn: &ChatTurn) {
        let (label, color) = match turn.role {
            Role::User => ("You:", color_primary()),
            Role::Assistant => ("AI:", color_accent()),
            Role::Shell => ("Shell:", color_success()),
            Role::System => ("System:", color_error()),
        };
        eprintln!("{} {}", self.label(label, color), turn.text);
    }

    fn notice(&self, msg: &str) {
        eprintln!("{}", self.tint(msg, color_muted()));
    }

    fn warn(&self, msg: &str) {
        eprintln!("{} {msg}", self.label(LABEL_WARNING, color_accent()));
    }

    fn error(&self, msg: &str) {
        eprintln!("{} {msg}", self.label(LABEL_ERROR, color_error()));
    }
}
