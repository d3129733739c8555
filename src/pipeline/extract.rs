//! Fenced code block extraction from assistant responses.
//!
//! This is a pure text-to-text pass: no I/O, no shared state beyond the
//! compiled pattern. Identical input always yields the same ordered commands.

use regex::Regex;
use std::sync::OnceLock;

use super::candidate::{CandidateIds, CommandCandidate};

/// Language tags stripped from the front of a block.
const SHELL_TAGS: [&str; 2] = ["bash", "shell"];

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    // Non-greedy with dot-matches-newline: each opening fence closes at the
    // nearest following fence, and an unmatched trailing fence never matches.
    FENCE.get_or_init(|| Regex::new(r"(?s)```(.*?)```").expect("static fence pattern"))
}

/// Extract command texts from every complete fence pair, in source order.
pub fn extract_commands(response_text: &str) -> Vec<String> {
    fence_pattern()
        .captures_iter(response_text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|block| normalize_block(block.as_str()))
        .collect()
}

/// Extract commands and wrap each one as a fresh `Idle` candidate.
pub fn extract_candidates(response_text: &str, ids: &CandidateIds) -> Vec<CommandCandidate> {
    extract_commands(response_text)
        .into_iter()
        .map(|command| CommandCandidate::new(ids.next_id(), command))
        .collect()
}

/// Trim a fenced block and drop a leading shell language tag.
///
/// Returns `None` when nothing but whitespace remains.
fn normalize_block(block: &str) -> Option<String> {
    let trimmed = block.trim();
    let body = strip_shell_tag(trimmed).unwrap_or(trimmed).trim_start();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// The tag only counts as a tag when it stands alone as the first word.
fn strip_shell_tag(text: &str) -> Option<&str> {
    SHELL_TAGS.iter().find_map(|tag| {
        let rest = text.strip_prefix(tag)?;
        match rest.chars().next() {
            None => Some(rest),
            Some(c) if c.is_whitespace() => Some(rest),
            Some(_) => None,
        }
    })
}
