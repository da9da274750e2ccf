//! SessionController -- drives one conversational query session.
//!
//! The controller owns a [`SessionState`] behind a `watch` channel so that
//! every transition is applied atomically and observers see a consistent
//! snapshot. A submission moves the session to `Waiting` synchronously and
//! spawns a dispatch task that races the query against the session timeout
//! and the request's cancellation token. Whatever the outcome, the task
//! appends exactly one assistant message and returns the session to `Idle`,
//! a panicking query service included.
//!
//! Events are published while the state's write lock is held, so the event
//! stream follows the same order as the transitions.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::{broadcast, watch};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use comanda_types::error::SessionError;
use comanda_types::event::SessionEvent;
use comanda_types::query::{QueryError, QueryRequest};
use comanda_types::session::{RequestFailure, SessionInfo, SessionKind, SessionSnapshot};

use super::format::{AssistantReply, ResponseFormat, format_for};
use super::state::{RequestTicket, SessionState, Submission};
use crate::event::EventBus;
use crate::query::BoxQueryService;

/// Capacity of each session's event channel.
const EVENT_CAPACITY: usize = 64;

/// Per-kind settings shared by every session opened from a blueprint.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Assistant message every new session starts with.
    pub greeting: String,
    /// Assistant message appended when a request fails.
    pub failure_notice: String,
    pub timeout: Duration,
    /// Metadata attached to every query.
    pub context: serde_json::Value,
}

/// Everything needed to open a session of one kind.
#[derive(Clone)]
pub struct SessionBlueprint {
    pub kind: SessionKind,
    pub service: BoxQueryService,
    pub format: Arc<dyn ResponseFormat>,
    pub options: Arc<SessionOptions>,
}

impl SessionBlueprint {
    /// Blueprint using the kind's default response format.
    pub fn new(kind: SessionKind, service: BoxQueryService, options: SessionOptions) -> Self {
        Self {
            kind,
            service,
            format: format_for(kind),
            options: Arc::new(options),
        }
    }

    pub fn with_format(mut self, format: Arc<dyn ResponseFormat>) -> Self {
        self.format = format;
        self
    }
}

impl std::fmt::Debug for SessionBlueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBlueprint")
            .field("kind", &self.kind)
            .field("service", &self.service.name())
            .field("format", &self.format.name())
            .field("timeout", &self.options.timeout)
            .finish()
    }
}

/// Result of a `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The message was appended and a request is in flight.
    Dispatched { ticket: RequestTicket },
    /// Nothing changed. Not an error: blank input and submissions while
    /// waiting are dropped silently.
    Ignored(SessionError),
}

impl SubmitOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SubmitOutcome::Dispatched { .. })
    }
}

/// State shared between the controller and its dispatch tasks.
struct Shared {
    id: Uuid,
    kind: SessionKind,
    state: watch::Sender<SessionState>,
    service: BoxQueryService,
    format: Arc<dyn ResponseFormat>,
    options: Arc<SessionOptions>,
    events: EventBus,
}

/// One conversational query session.
///
/// Dropping the controller cancels any request still in flight.
pub struct SessionController {
    shared: Arc<Shared>,
}

impl SessionController {
    /// Open a new idle session seeded with the blueprint's greeting.
    pub fn new(blueprint: &SessionBlueprint) -> Self {
        let id = Uuid::now_v7();
        let state = SessionState::new(id, blueprint.kind, &blueprint.options.greeting);
        let (sender, _) = watch::channel(state);

        Self {
            shared: Arc::new(Shared {
                id,
                kind: blueprint.kind,
                state: sender,
                service: blueprint.service.clone(),
                format: blueprint.format.clone(),
                options: blueprint.options.clone(),
                events: EventBus::new(EVENT_CAPACITY),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn kind(&self) -> SessionKind {
        self.shared.kind
    }

    /// Submit `text` as the next user message.
    ///
    /// On `Idle` with non-blank text this appends the user message, clears
    /// the composer, enters `Waiting` and dispatches the query in a spawned
    /// task. Must be called from within a Tokio runtime.
    pub fn submit(&self, text: &str) -> SubmitOutcome {
        let shared = &self.shared;
        let mut begun = Err(SessionError::Busy);
        shared.state.send_if_modified(|state| {
            begun = state.begin_submit(text);
            let Ok(submission) = &begun else {
                return false;
            };
            shared.events.publish(SessionEvent::MessageAppended {
                session_id: shared.id,
                message: submission.message.clone(),
            });
            shared.events.publish(SessionEvent::AwaitingResponse {
                session_id: shared.id,
                ticket: submission.ticket.value(),
            });
            true
        });

        let submission = match begun {
            Ok(submission) => submission,
            Err(reason) => {
                debug!(session_id = %self.shared.id, %reason, "submission ignored");
                return SubmitOutcome::Ignored(reason);
            }
        };

        let ticket = submission.ticket;

        let span = info_span!(
            "session.dispatch",
            session.id = %self.shared.id,
            session.kind = %self.shared.kind,
            request.ticket = ticket.value(),
            query.service = self.shared.service.name(),
        );
        tokio::spawn(dispatch(self.shared.clone(), submission).instrument(span));

        SubmitOutcome::Dispatched { ticket }
    }

    /// Replace the composer text. Allowed in any phase.
    pub fn update_pending_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.shared.state.send_if_modified(|state| {
            if state.pending_input() == text {
                return false;
            }
            state.update_pending_input(text);
            true
        });
    }

    /// Cancel the in-flight request, if any.
    ///
    /// The session settles through the normal failure path: one fallback
    /// message is appended and the session returns to `Idle`.
    pub fn cancel(&self) -> bool {
        let cancelled = self.shared.state.borrow().cancel_in_flight();
        if cancelled {
            info!(session_id = %self.shared.id, "in-flight request cancelled");
        }
        cancelled
    }

    /// Cancel any in-flight request and tell subscribers the session is gone.
    pub fn close(&self) {
        self.cancel();
        self.shared.events.publish(SessionEvent::Closed {
            session_id: self.shared.id,
        });
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.borrow().snapshot()
    }

    /// Listing entry without copying the transcript.
    pub fn info(&self) -> SessionInfo {
        let state = self.shared.state.borrow();
        SessionInfo {
            id: self.shared.id,
            kind: self.shared.kind,
            message_count: state.log().len(),
            awaiting_response: state.awaiting_response(),
        }
    }

    /// Watch the full session state; the receiver is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Receive transition events for this session.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Resolve once the session is `Idle` and return its snapshot.
    pub async fn wait_idle(&self) -> SessionSnapshot {
        let mut receiver = self.shared.state.subscribe();
        match receiver.wait_for(|state| !state.awaiting_response()).await {
            Ok(state) => state.snapshot(),
            Err(_) => self.snapshot(),
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.shared.state.borrow().cancel_in_flight();
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("id", &self.shared.id)
            .field("kind", &self.shared.kind)
            .field("service", &self.shared.service.name())
            .finish()
    }
}

/// Await the query for `submission` and settle the session.
async fn dispatch(shared: Arc<Shared>, submission: Submission) {
    let Submission {
        ticket,
        prompt,
        cancel,
        ..
    } = submission;
    let request = QueryRequest::new(prompt).with_context(shared.options.context.clone());
    let timeout = shared.options.timeout;

    info!(prompt_len = request.prompt.len(), "dispatching query");

    let answer = async {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(QueryError::Cancelled),
            outcome = tokio::time::timeout(timeout, shared.service.ask(&request)) => match outcome {
                Ok(result) => result,
                Err(_) => Err(QueryError::Timeout {
                    after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            },
        };
        result.and_then(|response| shared.format.format(response))
    };

    let outcome = AssertUnwindSafe(answer)
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| {
            Err(QueryError::Malformed(format!(
                "query handling panicked: {}",
                panic_message(&*payload)
            )))
        });

    match outcome {
        Ok(reply) => settle_success(&shared, ticket, reply),
        Err(error) => settle_failure(&shared, ticket, &error),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

fn settle_success(shared: &Shared, ticket: RequestTicket, reply: AssistantReply) {
    let settled = shared.state.send_if_modified(|state| {
        let Some(message) = state.complete(ticket, reply) else {
            return false;
        };
        info!(has_chart = message.has_chart, "response received");
        shared.events.publish(SessionEvent::MessageAppended {
            session_id: shared.id,
            message,
        });
        shared.events.publish(SessionEvent::Idle {
            session_id: shared.id,
        });
        true
    });

    if !settled {
        debug!(ticket = ticket.value(), "discarding stale response");
    }
}

fn settle_failure(shared: &Shared, ticket: RequestTicket, error: &QueryError) {
    let failure = RequestFailure::from(error);
    let notice = shared.options.failure_notice.as_str();

    let settled = shared.state.send_if_modified(|state| {
        let Some(message) = state.fail(ticket, failure.clone(), notice) else {
            return false;
        };
        warn!(kind = %failure.kind, retryable = failure.retryable, %error, "query failed");
        shared.events.publish(SessionEvent::MessageAppended {
            session_id: shared.id,
            message,
        });
        shared.events.publish(SessionEvent::ResponseFailed {
            session_id: shared.id,
            failure: failure.clone(),
        });
        shared.events.publish(SessionEvent::Idle {
            session_id: shared.id,
        });
        true
    });

    if !settled {
        debug!(ticket = ticket.value(), %error, "discarding stale failure");
    }
}
