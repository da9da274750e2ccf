//! Interactive terminal chat over a query session.
//!
//! Renders the session transcript, shows the pending label while a response
//! is outstanding, and maps slash commands and Ctrl+C onto the session's
//! operations. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
