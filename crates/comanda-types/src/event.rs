//! Session events published to the rendering layer.
//!
//! Every state transition of a query session is mirrored as a
//! `SessionEvent` on the session's event bus so that streaming consumers
//! (SSE clients, the terminal chat) can react without polling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{RequestFailure, SessionMessage};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A message was appended to the transcript.
    MessageAppended {
        session_id: Uuid,
        message: SessionMessage,
    },

    /// A request was dispatched; the session is now waiting.
    AwaitingResponse { session_id: Uuid, ticket: u64 },

    /// The in-flight request failed and a fallback message was appended.
    ResponseFailed {
        session_id: Uuid,
        failure: RequestFailure,
    },

    /// The session returned to idle and accepts submissions again.
    Idle { session_id: Uuid },

    /// The session was closed by its hosting view.
    Closed { session_id: Uuid },
}

impl SessionEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::MessageAppended { session_id, .. }
            | SessionEvent::AwaitingResponse { session_id, .. }
            | SessionEvent::ResponseFailed { session_id, .. }
            | SessionEvent::Idle { session_id }
            | SessionEvent::Closed { session_id } => *session_id,
        }
    }

    /// Event name used for SSE `event:` lines.
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::MessageAppended { .. } => "message_appended",
            SessionEvent::AwaitingResponse { .. } => "awaiting_response",
            SessionEvent::ResponseFailed { .. } => "response_failed",
            SessionEvent::Idle { .. } => "idle",
            SessionEvent::Closed { .. } => "closed",
        }
    }
}
