//! Conversational session types for Comanda.
//!
//! These types model a query session between a user and a remote assistant:
//! the messages of its transcript, the observable snapshot handed to the
//! rendering layer, and the failure records attached to fallback messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::query::QueryError;

/// Author of a session message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// Which surface a session backs.
///
/// Both kinds share the same controller; they differ in query endpoint,
/// copy, and response formatting (plain text vs chart-annotated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Assistant,
    Analytics,
}

impl SessionKind {
    pub const ALL: [SessionKind; 2] = [SessionKind::Assistant, SessionKind::Analytics];
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Assistant => write!(f, "assistant"),
            SessionKind::Analytics => write!(f, "analytics"),
        }
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assistant" | "chat" => Ok(SessionKind::Assistant),
            "analytics" | "manager" => Ok(SessionKind::Analytics),
            other => Err(format!("invalid session kind: '{other}'")),
        }
    }
}

/// Loading state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// No request outstanding; submissions are accepted.
    Idle,
    /// A request is outstanding; submissions are ignored.
    Waiting,
}

/// Category of a failed query round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Transport error or non-success response.
    RequestFailed,
    TimedOut,
    Cancelled,
    /// The service answered with something that is not a usable message.
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::RequestFailed => write!(f, "request_failed"),
            FailureKind::TimedOut => write!(f, "timed_out"),
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::MalformedResponse => write!(f, "malformed_response"),
        }
    }
}

/// A failed round trip, as recorded on the fallback message and on the
/// session's `last_error` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestFailure {
    pub kind: FailureKind,
    /// Human-readable cause (the underlying error's display text).
    pub detail: String,
    /// Whether resubmitting may succeed.
    pub retryable: bool,
}

impl From<&QueryError> for RequestFailure {
    fn from(error: &QueryError) -> Self {
        let kind = match error {
            QueryError::Timeout { .. } => FailureKind::TimedOut,
            QueryError::Cancelled => FailureKind::Cancelled,
            QueryError::Malformed(_) => FailureKind::MalformedResponse,
            _ => FailureKind::RequestFailed,
        };
        Self {
            kind,
            detail: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

/// A single authored entry in a session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Whether the message carries supplementary chart data.
    #[serde(default)]
    pub has_chart: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<serde_json::Value>,
    /// Set on synthetic fallback messages appended after a failed request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<RequestFailure>,
}

impl SessionMessage {
    /// A message typed by the user.
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::User,
            content: content.into(),
            timestamp,
            has_chart: false,
            chart: None,
            failure: None,
        }
    }

    /// A plain assistant message.
    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp,
            has_chart: false,
            chart: None,
            failure: None,
        }
    }

    /// Whether this is a fallback message standing in for a failed response.
    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}

/// Read-only copy of a session's observable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub kind: SessionKind,
    pub log: Vec<SessionMessage>,
    pub pending_input: String,
    pub awaiting_response: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<RequestFailure>,
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        if self.awaiting_response {
            SessionPhase::Waiting
        } else {
            SessionPhase::Idle
        }
    }
}

/// Lightweight listing entry for open sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub kind: SessionKind,
    pub message_count: usize,
    pub awaiting_response: bool,
}
