//! HttpQueryService -- concrete [`QueryService`] posting prompts to a JSON
//! backend over HTTP.
//!
//! One instance serves one endpoint (`/chat`, `/manager/ask`, ...). The
//! optional bearer token is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};
use tracing::{Instrument, Span, debug, debug_span, field};

use comanda_core::query::QueryService;
use comanda_observe::attrs::QUERY_STATUS;
use comanda_types::config::SessionProfile;
use comanda_types::query::{QueryError, QueryRequest, QueryResponse};

use super::wire::{parse_response, request_body, status_error};

pub struct HttpQueryService {
    client: reqwest::Client,
    url: String,
    endpoint: String,
    prompt_field: String,
    api_key: Option<SecretString>,
}

impl HttpQueryService {
    /// Service posting to `{base_url}{profile.endpoint}`.
    pub fn new(client: reqwest::Client, base_url: &str, profile: &SessionProfile) -> Self {
        Self {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), profile.endpoint),
            endpoint: profile.endpoint.clone(),
            prompt_field: profile.prompt_field.clone(),
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn post(&self, request: &QueryRequest, span: &Span) -> Result<QueryResponse, QueryError> {
        let body = request_body(&request.prompt, &self.prompt_field, &request.context);

        let mut builder = self.client.post(&self.url).json(&body);
        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| QueryError::Unreachable(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        span.record(QUERY_STATUS, status.as_u16());

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), error_body, retry_after));
        }

        let text = response
            .text()
            .await
            .map_err(|e| QueryError::Malformed(format!("failed to read response body: {e}")))?;
        let parsed = parse_response(&text)?;
        debug!(chart_available = parsed.chart_available, "query answered");
        Ok(parsed)
    }
}

// No Debug derive: the struct holds the API key.

impl QueryService for HttpQueryService {
    fn name(&self) -> &str {
        "http"
    }

    async fn ask(&self, request: &QueryRequest) -> Result<QueryResponse, QueryError> {
        let span = debug_span!(
            "query.http",
            query.endpoint = %self.endpoint,
            query.status = field::Empty,
        );
        self.post(request, &span).instrument(span.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::IntoResponse;
    use axum::routing::post;
    use serde_json::{Value, json};

    async fn chat(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        Json(json!({
            "response": format!("echo: {}", body["message"].as_str().unwrap_or("")),
            "customer_id": body["customer_id"].clone(),
            "auth": auth,
        }))
    }

    async fn manager(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({
            "content": format!("Top SKUs for {}", body["prompt"].as_str().unwrap_or("")),
            "chart_available": true,
            "chart_payload": { "type": "bar" }
        }))
    }

    async fn limited() -> impl IntoResponse {
        (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "3")], "slow down")
    }

    async fn broken() -> impl IntoResponse {
        (StatusCode::BAD_GATEWAY, "upstream down")
    }

    async fn garbage() -> impl IntoResponse {
        (StatusCode::OK, "<html>not json</html>")
    }

    async fn spawn_backend() -> String {
        let router = Router::new()
            .route("/chat", post(chat))
            .route("/manager/ask", post(manager))
            .route("/limited", post(limited))
            .route("/broken", post(broken))
            .route("/garbage", post(garbage));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn profile(endpoint: &str, prompt_field: &str) -> SessionProfile {
        let mut profile = SessionProfile::assistant_defaults();
        profile.endpoint = endpoint.to_string();
        profile.prompt_field = prompt_field.to_string();
        profile
    }

    #[tokio::test]
    async fn posts_prompt_with_context() {
        let base = spawn_backend().await;
        let service = HttpQueryService::new(reqwest::Client::new(), &base, &profile("/chat", "message"))
            .with_api_key(SecretString::from("test-key-not-real"));

        let request =
            QueryRequest::new("hola").with_context(json!({ "customer_id": "user_123" }));
        let response = service.ask(&request).await.unwrap();
        assert_eq!(response.content, "echo: hola");
        assert!(!response.chart_available);
        assert_eq!(service.name(), "http");
    }

    #[tokio::test]
    async fn chart_answer_is_parsed() {
        let base = spawn_backend().await;
        let service = HttpQueryService::new(
            reqwest::Client::new(),
            &format!("{base}/"),
            &profile("/manager/ask", "prompt"),
        );
        assert_eq!(service.url(), format!("{base}/manager/ask"));

        let response = service.ask(&QueryRequest::new("store 3")).await.unwrap();
        assert_eq!(response.content, "Top SKUs for store 3");
        assert!(response.chart_available);
        assert_eq!(response.chart_payload.unwrap()["type"], "bar");
    }

    #[tokio::test]
    async fn error_statuses_are_mapped() {
        let base = spawn_backend().await;
        let ask = |endpoint: &str| {
            let service =
                HttpQueryService::new(reqwest::Client::new(), &base, &profile(endpoint, "prompt"));
            async move { service.ask(&QueryRequest::new("x")).await }
        };

        assert_eq!(
            ask("/limited").await.unwrap_err(),
            QueryError::RateLimited {
                retry_after_ms: Some(3_000)
            }
        );
        assert!(matches!(
            ask("/broken").await.unwrap_err(),
            QueryError::Unavailable { status: 502, .. }
        ));
        assert!(matches!(
            ask("/garbage").await.unwrap_err(),
            QueryError::Malformed(_)
        ));
        assert!(matches!(
            ask("/missing").await.unwrap_err(),
            QueryError::InvalidPrompt(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_backend() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = HttpQueryService::new(
            reqwest::Client::new(),
            &format!("http://{addr}"),
            &profile("/chat", "message"),
        );
        let err = service.ask(&QueryRequest::new("hola")).await.unwrap_err();
        assert!(matches!(err, QueryError::Unreachable(_)));
        assert!(err.is_retryable());
    }
}
