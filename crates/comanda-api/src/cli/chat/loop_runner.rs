//! Main chat loop orchestration.
//!
//! Opens a session, prints the banner and greeting, then alternates between
//! reading input and waiting for the pending response. While a response is
//! outstanding the prompt shows the surface's pending label, new prompts are
//! refused as busy, and Ctrl+C or `/cancel` cancels the request.

use std::io::Write;

use console::style;
use tracing::info;

use comanda_core::session::SubmitOutcome;
use comanda_types::error::SessionError;
use comanda_types::session::{MessageRole, SessionKind, SessionSnapshot};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{render_history, render_message};

/// Print assistant entries appended since `shown` and return the new count.
///
/// User entries are skipped: readline already echoed them.
fn render_new(
    out: &mut impl Write,
    kind: SessionKind,
    snapshot: &SessionSnapshot,
    shown: usize,
) -> std::io::Result<usize> {
    for message in snapshot.log.iter().skip(shown) {
        if message.role == MessageRole::Assistant {
            render_message(out, kind, message)?;
        }
    }
    Ok(snapshot.log.len())
}

/// Run the interactive chat loop for a session of `kind`.
pub async fn run_chat_loop(state: &AppState, kind: SessionKind) -> anyhow::Result<()> {
    let session = state.sessions.open(kind)?;
    let profile = state.config.profile(kind);
    let session_id = session.id();
    info!(session.id = %session_id, session.kind = %kind, "chat session started");

    print_welcome_banner(kind, &profile.endpoint, &session_id.to_string());

    let idle_prompt = format!("  {} ", style("Tú >").green().bold());
    let pending_prompt = format!("  {} ", style(&profile.pending_label).yellow().italic());
    let (mut input, mut out) = ChatInput::new(idle_prompt.clone())
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut shown = render_new(&mut out, kind, &session.snapshot(), 0)?;

    loop {
        let event = if session.snapshot().awaiting_response {
            tokio::select! {
                snapshot = session.wait_idle() => {
                    shown = render_new(&mut out, kind, &snapshot, shown)?;
                    input.update_prompt(&idle_prompt);
                    continue;
                }
                event = input.read_line() => event,
            }
        } else {
            input.read_line().await
        };

        match event {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                if session.cancel() {
                    writeln!(out, "  {}", style("Cancelando la consulta...").dim())?;
                } else {
                    writeln!(
                        out,
                        "  {}",
                        style("Press Ctrl+D to exit, or keep chatting.").dim()
                    )?;
                }
            }
            InputEvent::Line(line) => {
                if let Some(cmd) = commands::parse(&line) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(&mut out)?,
                        ChatCommand::History => {
                            render_history(&mut out, kind, &session.snapshot().log)?
                        }
                        ChatCommand::Cancel => {
                            if !session.cancel() {
                                writeln!(out, "  {}", style("Nothing to cancel.").dim())?;
                            }
                        }
                        ChatCommand::Clear => input.clear(),
                        ChatCommand::Exit => break,
                        ChatCommand::Unknown(name) => writeln!(
                            out,
                            "\n  {} Unknown command: {}. Type /help for available commands.\n",
                            style("?").yellow().bold(),
                            style(name).dim()
                        )?,
                    }
                    continue;
                }

                match session.submit(&line) {
                    SubmitOutcome::Dispatched { .. } => {
                        shown = session.snapshot().log.len();
                        input.update_prompt(&pending_prompt);
                    }
                    SubmitOutcome::Ignored(SessionError::Busy) => writeln!(
                        out,
                        "  {} {}",
                        style("!").yellow().bold(),
                        style(format!(
                            "{} Espera la respuesta o usa /cancel.",
                            profile.pending_label
                        ))
                        .dim()
                    )?,
                    SubmitOutcome::Ignored(_) => {}
                }
            }
        }
    }

    input.flush();
    state.sessions.close(session_id)?;
    info!(session.id = %session_id, "chat session ended");
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use comanda_types::session::SessionMessage;
    use uuid::Uuid;

    #[test]
    fn render_new_skips_seen_and_user_entries() {
        let snapshot = SessionSnapshot {
            id: Uuid::now_v7(),
            kind: SessionKind::Assistant,
            log: vec![
                SessionMessage::assistant("¡Hola!", Utc::now()),
                SessionMessage::user("menú del día", Utc::now()),
                SessionMessage::assistant("Tacos al Pastor", Utc::now()),
            ],
            pending_input: String::new(),
            awaiting_response: false,
            last_error: None,
        };

        let mut out = Vec::new();
        let shown = render_new(&mut out, SessionKind::Assistant, &snapshot, 1).unwrap();
        assert_eq!(shown, 3);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Tacos al Pastor"));
        assert!(!text.contains("¡Hola!"));
        assert!(!text.contains("menú del día"));
    }
}
