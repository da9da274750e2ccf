//! Session state machine.
//!
//! `SessionState` owns the transcript, the composer text and the in-flight
//! request of one session. All transitions are synchronous methods so the
//! controller can apply each one atomically; the async round trip lives in
//! the controller.
//!
//! States: `Idle` (no request in flight) and `Waiting`. Every dispatched
//! request gets a ticket; only the continuation holding the in-flight
//! ticket may settle it, which keeps the log in append order even if a
//! stale continuation fires late.

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use comanda_types::error::SessionError;
use comanda_types::session::{
    RequestFailure, SessionKind, SessionMessage, SessionPhase, SessionSnapshot,
};

use super::format::AssistantReply;

/// Sequence number identifying one dispatched request within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What `begin_submit` hands back to the dispatcher.
#[derive(Debug, Clone)]
pub struct Submission {
    pub ticket: RequestTicket,
    /// The prompt exactly as submitted.
    pub prompt: String,
    /// The user message that was appended.
    pub message: SessionMessage,
    /// Fires when the request is cancelled.
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: RequestTicket,
    cancel: CancellationToken,
}

/// Observable state of one query session.
#[derive(Debug, Clone)]
pub struct SessionState {
    id: Uuid,
    kind: SessionKind,
    log: Vec<SessionMessage>,
    pending_input: String,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    last_error: Option<RequestFailure>,
}

impl SessionState {
    /// Create an idle session seeded with one assistant greeting.
    pub fn new(id: Uuid, kind: SessionKind, greeting: &str) -> Self {
        Self {
            id,
            kind,
            log: vec![SessionMessage::assistant(greeting, Utc::now())],
            pending_input: String::new(),
            in_flight: None,
            next_ticket: 1,
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn log(&self) -> &[SessionMessage] {
        &self.log
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn awaiting_response(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.awaiting_response() {
            SessionPhase::Waiting
        } else {
            SessionPhase::Idle
        }
    }

    pub fn last_error(&self) -> Option<&RequestFailure> {
        self.last_error.as_ref()
    }

    /// Ticket of the request currently in flight, if any.
    pub fn in_flight_ticket(&self) -> Option<RequestTicket> {
        self.in_flight.as_ref().map(|f| f.ticket)
    }

    /// Replace the composer text. Accepts anything, including empty text.
    pub fn update_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// `Idle -> Waiting`: append the user message and open a request.
    ///
    /// Blank text and submissions while waiting leave the state untouched.
    pub fn begin_submit(&mut self, text: &str) -> Result<Submission, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        if self.in_flight.is_some() {
            return Err(SessionError::Busy);
        }

        let message = SessionMessage::user(text, self.next_timestamp());
        self.log.push(message.clone());
        self.pending_input.clear();

        let ticket = RequestTicket(self.next_ticket);
        self.next_ticket += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(InFlight {
            ticket,
            cancel: cancel.clone(),
        });

        Ok(Submission {
            ticket,
            prompt: text.to_string(),
            message,
            cancel,
        })
    }

    /// `Waiting -> Idle` on success. Returns the appended assistant message,
    /// or `None` when `ticket` is not the request in flight.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        reply: AssistantReply,
    ) -> Option<SessionMessage> {
        if !self.settle(ticket) {
            return None;
        }

        let mut message = SessionMessage::assistant(reply.content, self.next_timestamp());
        message.has_chart = reply.has_chart;
        message.chart = reply.chart;
        self.log.push(message.clone());
        self.last_error = None;
        Some(message)
    }

    /// `Waiting -> Idle` on failure. Appends exactly one fallback message
    /// carrying `failure` and raises the error flag.
    pub fn fail(
        &mut self,
        ticket: RequestTicket,
        failure: RequestFailure,
        notice: &str,
    ) -> Option<SessionMessage> {
        if !self.settle(ticket) {
            return None;
        }

        let mut message = SessionMessage::assistant(notice, self.next_timestamp());
        message.failure = Some(failure.clone());
        self.log.push(message.clone());
        self.last_error = Some(failure);
        Some(message)
    }

    /// Trigger cancellation of the in-flight request.
    ///
    /// Does not change the state itself: the request's continuation observes
    /// the token and settles the request as a failure.
    pub fn cancel_in_flight(&self) -> bool {
        match &self.in_flight {
            Some(in_flight) if !in_flight.cancel.is_cancelled() => {
                in_flight.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            kind: self.kind,
            log: self.log.clone(),
            pending_input: self.pending_input.clone(),
            awaiting_response: self.awaiting_response(),
            last_error: self.last_error.clone(),
        }
    }

    fn settle(&mut self, ticket: RequestTicket) -> bool {
        match &self.in_flight {
            Some(in_flight) if in_flight.ticket == ticket => {
                self.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Never earlier than the last logged message, even if the wall clock
    /// steps backwards.
    fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.log.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        }
    }
}
