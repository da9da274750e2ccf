//! Welcome banner display for chat sessions.

use console::style;

use comanda_types::session::SessionKind;

/// Title shown for each session kind.
pub fn kind_title(kind: SessionKind) -> &'static str {
    match kind {
        SessionKind::Assistant => "Asistente de restaurante",
        SessionKind::Analytics => "Analytics",
    }
}

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(kind: SessionKind, endpoint: &str, session_id: &str) {
    println!();
    println!("  {}", style(kind_title(kind)).cyan().bold());
    println!();
    println!("  {}  {}", style("Endpoint:").bold(), style(endpoint).dim());
    println!(
        "  {}   {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
