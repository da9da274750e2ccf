//! Query service request/response types for Comanda.
//!
//! These types model the contract with the remote assistant/analytics
//! backend: a natural-language prompt goes in, a structured answer
//! (optionally annotated with chart data) comes back.

use serde::{Deserialize, Serialize};

/// Request sent to a query service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The user's natural-language prompt, exactly as submitted.
    pub prompt: String,
    /// Opaque per-deployment metadata (customer id, store id, ...).
    #[serde(default)]
    pub context: serde_json::Value,
}

impl QueryRequest {
    /// Create a request with an empty (`null`) context.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            context: serde_json::Value::Null,
        }
    }

    /// Attach deployment metadata to the request.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}

/// Successful answer from a query service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub content: String,
    /// Whether the answer includes supplementary chart data.
    #[serde(default)]
    pub chart_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_payload: Option<serde_json::Value>,
}

impl QueryResponse {
    /// Plain text answer with no chart.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            chart_available: false,
            chart_payload: None,
        }
    }
}

/// Errors from query service operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("query service unreachable: {0}")]
    Unreachable(String),

    #[error("query service unavailable (HTTP {status}): {message}")]
    Unavailable { status: u16, message: String },

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("query timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid prompt: {0}")]
    InvalidPrompt(String),

    #[error("query service rejected credentials")]
    Unauthorized,

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl QueryError {
    /// Whether resubmitting the same prompt may succeed.
    ///
    /// Transport-level and capacity problems are retryable; problems with the
    /// prompt itself, credentials or the response shape are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QueryError::Unreachable(..)
                | QueryError::Unavailable { .. }
                | QueryError::RateLimited { .. }
                | QueryError::Timeout { .. }
                | QueryError::Cancelled
        )
    }
}
