//! Conversational query sessions.
//!
//! A session is a transcript of user and assistant messages plus a single
//! in-flight request slot. `SessionController` drives one session;
//! `SessionRegistry` keeps the sessions of a process addressable by id.

pub mod controller;
pub mod format;
pub mod registry;
pub mod state;

pub use controller::{SessionBlueprint, SessionController, SessionOptions, SubmitOutcome};
pub use format::{AssistantReply, ChartAnnotated, PlainText, ResponseFormat, format_for};
pub use registry::SessionRegistry;
pub use state::{RequestTicket, SessionState};
