//! Terminal rendering of session transcript entries.

use std::io::Write;

use console::style;

use comanda_types::session::{MessageRole, SessionKind, SessionMessage};

use super::banner::kind_title;

/// Longest message shown in full by `/history`.
const HISTORY_PREVIEW_CHARS: usize = 100;

/// Shorten `content` to at most `max_chars` characters, ending in `...`.
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let kept: String = content.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Print one transcript entry with its chart note or failure detail.
pub fn render_message(
    out: &mut impl Write,
    kind: SessionKind,
    message: &SessionMessage,
) -> std::io::Result<()> {
    match message.role {
        MessageRole::User => {
            writeln!(out, "  {} {}", style("Tú >").green().bold(), message.content)?;
        }
        MessageRole::Assistant => {
            writeln!(out)?;
            writeln!(out, "  {}", style(kind_title(kind)).cyan().bold())?;
            for line in message.content.lines() {
                writeln!(out, "  {line}")?;
            }
            if message.has_chart {
                writeln!(out, "  {}", style("[gráfica disponible]").magenta())?;
            }
            if let Some(failure) = &message.failure {
                let hint = if failure.retryable {
                    "puedes reintentar"
                } else {
                    "revisa la consulta"
                };
                writeln!(
                    out,
                    "  {} {} {}",
                    style("!").red().bold(),
                    style(format!("{}: {}", failure.kind, failure.detail)).dim(),
                    style(format!("({hint})")).dim()
                )?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Print the whole transcript, one shortened line per entry.
pub fn render_history(
    out: &mut impl Write,
    kind: SessionKind,
    log: &[SessionMessage],
) -> std::io::Result<()> {
    writeln!(out)?;
    for message in log {
        let label = match message.role {
            MessageRole::User => format!("{}", style("Tú").green()),
            MessageRole::Assistant => format!("{}", style(kind_title(kind)).cyan()),
        };
        writeln!(
            out,
            "  {} {} {}",
            style(message.timestamp.format("%H:%M:%S")).dim(),
            style(label).bold(),
            preview(&message.content, HISTORY_PREVIEW_CHARS)
        )?;
    }
    writeln!(out)
}
