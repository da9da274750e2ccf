//! Wire format of the query backend.
//!
//! The backend's answer field names vary between deployments, so the
//! response accepts a few aliases per field.

use serde::Deserialize;
use serde_json::{Map, Value};

use comanda_types::query::{QueryError, QueryResponse};

/// Build the JSON body: the context object's fields plus the prompt under
/// `prompt_field`. A non-object context is ignored.
pub fn request_body(prompt: &str, prompt_field: &str, context: &Value) -> Value {
    let mut body = match context {
        Value::Object(fields) => fields.clone(),
        _ => Map::new(),
    };
    body.insert(prompt_field.to_string(), Value::String(prompt.to_string()));
    Value::Object(body)
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default, alias = "response", alias = "answer", alias = "message")]
    content: Option<String>,
    #[serde(default, alias = "has_chart", alias = "chartAvailable")]
    chart_available: bool,
    #[serde(default, alias = "chart", alias = "chartPayload")]
    chart_payload: Option<Value>,
}

/// Parse a success body into a [`QueryResponse`].
///
/// A chart payload implies chart availability even if the flag is absent.
pub fn parse_response(body: &str) -> Result<QueryResponse, QueryError> {
    let wire: WireResponse = serde_json::from_str(body)
        .map_err(|e| QueryError::Malformed(format!("failed to parse response: {e}")))?;

    let content = wire
        .content
        .ok_or_else(|| QueryError::Malformed("response has no content field".to_string()))?;
    let chart_payload = wire.chart_payload.filter(|payload| !payload.is_null());

    Ok(QueryResponse {
        content,
        chart_available: wire.chart_available || chart_payload.is_some(),
        chart_payload,
    })
}

/// Map a non-success HTTP status to a [`QueryError`].
///
/// Client errors other than auth and rate limiting mean the prompt was
/// rejected; everything else is treated as the service being unavailable.
pub fn status_error(status: u16, body: String, retry_after_secs: Option<u64>) -> QueryError {
    match status {
        401 | 403 => QueryError::Unauthorized,
        429 => QueryError::RateLimited {
            retry_after_ms: retry_after_secs.map(|secs| secs.saturating_mul(1_000)),
        },
        400..=499 => QueryError::InvalidPrompt(format!("HTTP {status}: {body}")),
        _ => QueryError::Unavailable {
            status,
            message: body,
        },
    }
}
