//! In-chat slash commands (`/cancel`, `/history`, ...).

use std::io::Write;

use console::style;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    Help,
    History,
    Cancel,
    Clear,
    Exit,
    Unknown(String),
}

/// Command, accepted spellings, help text. The first spelling is shown in
/// `/help`.
const COMMANDS: &[(ChatCommand, &[&str], &str)] = &[
    (ChatCommand::Help, &["/help", "/h", "/?"], "Show this help message"),
    (ChatCommand::History, &["/history", "/log"], "Show the conversation so far"),
    (ChatCommand::Cancel, &["/cancel", "/stop"], "Cancel the pending response"),
    (ChatCommand::Clear, &["/clear", "/cls"], "Clear the screen"),
    (ChatCommand::Exit, &["/exit", "/quit", "/q"], "End the chat session"),
];

/// `None` when `input` is a prompt for the session rather than a command.
/// Anything after the first word is ignored.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let word = input.split_whitespace().next()?;
    if !word.starts_with('/') {
        return None;
    }
    let word = word.to_lowercase();

    let command = COMMANDS
        .iter()
        .find(|(_, spellings, _)| spellings.contains(&word.as_str()))
        .map(|(command, _, _)| command.clone())
        .unwrap_or(ChatCommand::Unknown(word));
    Some(command)
}

pub fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    for (_, spellings, text) in COMMANDS {
        let name = spellings.first().copied().unwrap_or_default();
        writeln!(out, "  {} {}", style(format!("{name:<8}")).cyan(), text)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Ctrl+C cancels a pending response, Ctrl+D exits").dim()
    )?;
    writeln!(out)
}
