//! Line editor for the chat loop.
//!
//! `read_line` is cancel-safe so the loop can race it against the session
//! becoming idle.

use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug)]
pub enum InputEvent {
    /// Raw line as typed; the session decides what counts as blank.
    Line(String),
    /// Ctrl+D, or the terminal went away.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

impl ChatInput {
    /// Editor plus a writer that prints above the prompt without garbling it.
    pub fn new(prompt: String) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, stdout) = Readline::new(prompt)?;
        Ok((Self { rl }, stdout))
    }

    pub fn update_prompt(&mut self, prompt: &str) {
        if let Err(e) = self.rl.update_prompt(prompt) {
            tracing::debug!(error = %e, "prompt update failed");
        }
    }

    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                if !line.trim().is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Line(line)
            }
            Ok(ReadlineEvent::Eof) => InputEvent::Eof,
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Err(e) => {
                tracing::debug!(error = %e, "readline failed, ending chat");
                InputEvent::Eof
            }
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.rl.clear() {
            tracing::debug!(error = %e, "screen clear failed");
        }
    }

    /// Restore the terminal before exit.
    pub fn flush(&mut self) {
        if let Err(e) = self.rl.flush() {
            tracing::debug!(error = %e, "readline flush failed");
        }
    }
}
