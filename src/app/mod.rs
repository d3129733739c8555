//! Binary-local application orchestration.
//!
//! `main.rs` only parses arguments; setup and dispatch live in `entry`, and
//! the interactive host in `repl_loop`.

pub(crate) mod commands;
pub(crate) mod entry;
pub(crate) mod exec_mode;
pub(crate) mod key;
pub(crate) mod repl_loop;
pub(crate) mod startup;
