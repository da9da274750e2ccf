//! Query session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions               - Open a session of a given kind
//! - GET    /api/v1/sessions               - List open sessions
//! - GET    /api/v1/sessions/{id}          - Snapshot of a session
//! - DELETE /api/v1/sessions/{id}          - Close a session
//! - POST   /api/v1/sessions/{id}/messages - Submit a prompt
//! - PUT    /api/v1/sessions/{id}/input    - Update the draft input
//! - POST   /api/v1/sessions/{id}/cancel   - Cancel the in-flight request
//! - GET    /api/v1/sessions/{id}/events   - SSE stream of session events

use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::Stream;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use comanda_core::session::SubmitOutcome;
use comanda_types::event::SessionEvent;
use comanda_types::session::{SessionInfo, SessionKind, SessionSnapshot};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenSessionRequest {
    pub kind: SessionKind,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

/// Result of `POST /sessions/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignored_reason: Option<&'static str>,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct CancelResult {
    pub cancelled: bool,
    pub session: SessionSnapshot,
}

fn session_link(id: &str) -> String {
    format!("/api/v1/sessions/{id}")
}

/// POST /api/v1/sessions - Open a session.
pub async fn open_session(
    State(state): State<AppState>,
    Json(body): Json<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionSnapshot>>), AppError> {
    let timer = RequestTimer::start();
    let session = state.sessions.open(body.kind)?;
    let id = session.id().to_string();

    let response = timer
        .respond(session.snapshot())
        .with_link("self", &session_link(&id))
        .with_link("messages", &format!("{}/messages", session_link(&id)))
        .with_link("events", &format!("{}/events", session_link(&id)));
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/sessions - List open sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<ApiResponse<Vec<SessionInfo>>> {
    let timer = RequestTimer::start();
    Json(timer.respond(state.sessions.list()).with_link("self", "/api/v1/sessions"))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let timer = RequestTimer::start();
    let session = state.sessions.get(parse_uuid(&id)?)?;
    Ok(Json(
        timer
            .respond(session.snapshot())
            .with_link("self", &session_link(&id)),
    ))
}

/// DELETE /api/v1/sessions/{id} - Close a session, cancelling any request.
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let timer = RequestTimer::start();
    state.sessions.close(parse_uuid(&id)?)?;
    Ok(Json(timer.respond(serde_json::json!({ "closed": true }))))
}

/// POST /api/v1/sessions/{id}/messages - Submit a prompt.
///
/// Blank text and submissions while a response is pending are not errors:
/// the answer reports `accepted: false` with the ignore reason.
pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SubmitResult>>), AppError> {
    let timer = RequestTimer::start();
    let session = state.sessions.get(parse_uuid(&id)?)?;

    let (status, accepted, ignored_reason) = match session.submit(&body.text) {
        SubmitOutcome::Dispatched { .. } => (StatusCode::ACCEPTED, true, None),
        SubmitOutcome::Ignored(reason) => (StatusCode::OK, false, Some(reason.code())),
    };

    let result = SubmitResult {
        accepted,
        ignored_reason,
        session: session.snapshot(),
    };
    let response = timer
        .respond(result)
        .with_link("session", &session_link(&id))
        .with_link("events", &format!("{}/events", session_link(&id)));
    Ok((status, Json(response)))
}

/// PUT /api/v1/sessions/{id}/input - Replace the draft input.
pub async fn update_input(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<TextRequest>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let timer = RequestTimer::start();
    let session = state.sessions.get(parse_uuid(&id)?)?;
    session.update_pending_input(body.text);
    Ok(Json(timer.respond(session.snapshot())))
}

/// POST /api/v1/sessions/{id}/cancel - Cancel the in-flight request.
///
/// Returns immediately; the fallback message lands once the dispatch task
/// observes the cancellation.
pub async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CancelResult>>, AppError> {
    let timer = RequestTimer::start();
    let session = state.sessions.get(parse_uuid(&id)?)?;
    let cancelled = session.cancel();
    Ok(Json(timer.respond(CancelResult {
        cancelled,
        session: session.snapshot(),
    })))
}

/// GET /api/v1/sessions/{id}/events - Server-Sent Events feed.
///
/// Opens with a `snapshot` event carrying the current state, then relays
/// every [`SessionEvent`] under its name. A slow client that falls behind
/// receives a `lagged` event and should refetch the snapshot. The stream
/// ends after `closed`.
pub async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let session = state.sessions.get(parse_uuid(&id)?)?;

    // Subscribe before the snapshot so no transition falls in between.
    let mut events = BroadcastStream::new(session.events());
    let snapshot = session.snapshot();
    drop(session);

    let stream = async_stream::stream! {
        yield Ok::<_, Infallible>(json_event("snapshot", &snapshot));

        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    let closed = matches!(event, SessionEvent::Closed { .. });
                    yield Ok(json_event(event.name(), &event));
                    if closed {
                        break;
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE client lagged behind session events");
                    yield Ok(json_event("lagged", &serde_json::json!({ "skipped": skipped })));
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

fn json_event<T: Serialize>(name: &str, payload: &T) -> Event {
    let data = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(name).data(data)
}
