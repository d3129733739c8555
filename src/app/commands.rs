//! Slash-command metadata and parsing for interactive mode.

/// Static slash command metadata used by parsing and `/help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlashCommand {
    pub name: &'static str,
    pub description: &'static str,
}

/// Built-in slash commands for interactive mode.
pub(crate) const SLASH_COMMANDS: [SlashCommand; 8] = [
    SlashCommand {
        name: "/list",
        description: "Show the commands from the latest response.",
    },
    SlashCommand {
        name: "/run",
        description: "Execute a command: /run <n>.",
    },
    SlashCommand {
        name: "/edit",
        description: "Replace a command's text: /edit <n> <new command>.",
    },
    SlashCommand {
        name: "/copy",
        description: "Copy a command to the clipboard: /copy <n>.",
    },
    SlashCommand {
        name: "/history",
        description: "Replay the conversation transcript.",
    },
    SlashCommand {
        name: "/help",
        description: "List available slash commands.",
    },
    SlashCommand {
        name: "/quit",
        description: "Exit interactive mode.",
    },
    SlashCommand {
        name: "/exit",
        description: "Exit interactive mode.",
    },
];

/// Parsed slash command actions consumed by the main loop.
///
/// Command numbers are kept as raw strings; the loop resolves them against
/// the live candidate list so it can report precise errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SlashCommandAction {
    List,
    Run(Option<String>),
    Edit {
        number: Option<String>,
        text: Option<String>,
    },
    Copy(Option<String>),
    History,
    Help,
    Quit,
    Unknown(String),
}

/// Parse a slash command from user input.
///
/// Returns `None` if the input is not a slash command.
pub(crate) fn parse_slash_command(input: &str) -> Option<SlashCommandAction> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (token, rest) = split_word(trimmed);
    let action = match token.to_ascii_lowercase().as_str() {
        "/" | "/help" => SlashCommandAction::Help,
        "/quit" | "/exit" | "/q" => SlashCommandAction::Quit,
        "/list" | "/ls" => SlashCommandAction::List,
        "/history" => SlashCommandAction::History,
        "/run" => SlashCommandAction::Run(first_word(rest)),
        "/copy" => SlashCommandAction::Copy(first_word(rest)),
        "/edit" => {
            let (number, text) = split_word(rest);
            SlashCommandAction::Edit {
                number: non_empty(number),
                // Everything after the number is the new command, verbatim.
                text: non_empty(text),
            }
        }
        _ => SlashCommandAction::Unknown(token.to_string()),
    };
    Some(action)
}

/// Resolve a 1-based command number typed by the user.
pub(crate) fn parse_command_number(arg: Option<&str>, available: usize) -> Result<usize, String> {
    let Some(arg) = arg else {
        return Err("missing command number".to_string());
    };
    let number = arg
        .parse::<usize>()
        .map_err(|_| format!("`{arg}` is not a command number"))?;
    if available == 0 {
        return Err("there are no commands; ask the assistant for one first".to_string());
    }
    if number == 0 || number > available {
        return Err(format!("command number must be between 1 and {available}"));
    }
    Ok(number - 1)
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(pos) => (&text[..pos], text[pos..].trim_start()),
        None => (text, ""),
    }
}

fn first_word(text: &str) -> Option<String> {
    non_empty(split_word(text).0)
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
