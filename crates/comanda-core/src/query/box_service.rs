//! BoxQueryService -- object-safe dynamic dispatch wrapper for QueryService.
//!
//! 1. Define an object-safe `QueryServiceDyn` trait with boxed futures
//! 2. Blanket-impl `QueryServiceDyn` for all `T: QueryService`
//! 3. `BoxQueryService` wraps `Arc<dyn QueryServiceDyn>` and delegates
//!
//! The inner pointer is an `Arc` so a session can hand a clone of its
//! service to the spawned task that awaits the response.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use comanda_types::query::{QueryError, QueryRequest, QueryResponse};

use super::service::QueryService;

/// Object-safe version of [`QueryService`] with boxed futures.
pub trait QueryServiceDyn: Send + Sync {
    fn name(&self) -> &str;

    fn ask_boxed<'a>(
        &'a self,
        request: &'a QueryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QueryResponse, QueryError>> + Send + 'a>>;
}

/// Blanket implementation: any `QueryService` automatically implements `QueryServiceDyn`.
impl<T: QueryService> QueryServiceDyn for T {
    fn name(&self) -> &str {
        QueryService::name(self)
    }

    fn ask_boxed<'a>(
        &'a self,
        request: &'a QueryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<QueryResponse, QueryError>> + Send + 'a>> {
        Box::pin(self.ask(request))
    }
}

/// Type-erased query service for runtime backend selection.
///
/// Since `QueryService` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxQueryService` provides equivalent methods that delegate to
/// the inner `QueryServiceDyn` trait object. Cloning is cheap.
#[derive(Clone)]
pub struct BoxQueryService {
    inner: Arc<dyn QueryServiceDyn + Send + Sync>,
}

impl BoxQueryService {
    /// Wrap a concrete `QueryService` in a type-erased box.
    pub fn new<T: QueryService + 'static>(service: T) -> Self {
        Self {
            inner: Arc::new(service),
        }
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Send a prompt and wait for the full answer.
    pub async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        self.inner.ask_boxed(request).await
    }
}

impl std::fmt::Debug for BoxQueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxQueryService")
            .field("name", &self.name())
            .finish()
    }
}
