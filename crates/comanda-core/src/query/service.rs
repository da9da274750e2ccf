//! QueryService trait definition.
//!
//! This is the port every assistant/analytics backend implements. Uses
//! RPITIT for `ask` so implementations can be plain `async fn`s.

use comanda_types::query::{QueryError, QueryRequest, QueryResponse};

/// Trait for remote query backends.
///
/// Turns a natural-language prompt into a structured answer. Transport and
/// endpoint shape are up to the implementation; the session controller only
/// sees this contract.
///
/// Implementations live in comanda-infra (e.g., `HttpQueryService`).
pub trait QueryService: Send + Sync {
    /// Human-readable backend name (e.g., "http:/manager/ask").
    fn name(&self) -> &str;

    /// Send a prompt and wait for the full answer.
    fn ask(
        &self,
        request: &QueryRequest,
    ) -> impl std::future::Future<Output = Result<QueryResponse, QueryError>> + Send;
}
