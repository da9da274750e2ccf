//! Response-format strategies.
//!
//! The assistant chat and the analytics chat differ only in how a query
//! answer becomes a transcript message: the assistant shows plain text, the
//! analytics surface keeps the chart annotation. Both reject answers with
//! no usable content.

use std::sync::Arc;

use comanda_types::query::{QueryError, QueryResponse};
use comanda_types::session::SessionKind;

/// The assistant-authored part of a completed round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub content: String,
    pub has_chart: bool,
    pub chart: Option<serde_json::Value>,
}

/// Strategy turning a query answer into an assistant reply.
pub trait ResponseFormat: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fails with `QueryError::Malformed` when the answer cannot be shown.
    fn format(&self, response: QueryResponse) -> Result<AssistantReply, QueryError>;
}

/// Text-only replies; chart data is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl ResponseFormat for PlainText {
    fn name(&self) -> &'static str {
        "plain_text"
    }

    fn format(&self, response: QueryResponse) -> Result<AssistantReply, QueryError> {
        let content = require_content(response.content)?;
        Ok(AssistantReply {
            content,
            has_chart: false,
            chart: None,
        })
    }
}

/// Replies flagged with the service's chart-availability indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartAnnotated;

impl ResponseFormat for ChartAnnotated {
    fn name(&self) -> &'static str {
        "chart_annotated"
    }

    fn format(&self, response: QueryResponse) -> Result<AssistantReply, QueryError> {
        let content = require_content(response.content)?;
        let has_chart = response.chart_available;
        Ok(AssistantReply {
            content,
            has_chart,
            chart: if has_chart { response.chart_payload } else { None },
        })
    }
}

fn require_content(content: String) -> Result<String, QueryError> {
    if content.trim().is_empty() {
        return Err(QueryError::Malformed(
            "response has no message content".to_string(),
        ));
    }
    Ok(content)
}

/// Strategy used by each session kind.
pub fn format_for(kind: SessionKind) -> Arc<dyn ResponseFormat> {
    match kind {
        SessionKind::Assistant => Arc::new(PlainText),
        SessionKind::Analytics => Arc::new(ChartAnnotated),
    }
}
