//! One-shot question: open a session, submit, wait, print the answer.

use console::style;

use comanda_core::session::SubmitOutcome;
use comanda_types::session::{MessageRole, SessionKind};

use crate::state::AppState;

/// Send `prompt` through a fresh session of `kind` and print the reply.
///
/// A failed request still prints the fallback message; the command then
/// exits with an error carrying the failure detail.
pub async fn ask(state: &AppState, kind: SessionKind, prompt: &str, json: bool) -> anyhow::Result<()> {
    let session = state.sessions.open(kind)?;
    let session_id = session.id();

    if let SubmitOutcome::Ignored(reason) = session.submit(prompt) {
        state.sessions.close(session_id)?;
        anyhow::bail!("Nothing to ask: {reason}");
    }

    let spinner = (!json).then(|| super::spinner(state.config.profile(kind).pending_label.clone()));
    let snapshot = session.wait_idle().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    state.sessions.close(session_id)?;

    let reply = snapshot
        .log
        .last()
        .filter(|message| message.role == MessageRole::Assistant)
        .ok_or_else(|| anyhow::anyhow!("session ended without a reply"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(reply)?);
    } else {
        println!();
        for line in reply.content.lines() {
            println!("  {line}");
        }
        if reply.has_chart {
            println!("  {}", style("[gráfica disponible]").magenta());
        }
        println!();
    }

    match &reply.failure {
        Some(failure) => Err(anyhow::anyhow!("{}: {}", failure.kind, failure.detail)),
        None => Ok(()),
    }
}
