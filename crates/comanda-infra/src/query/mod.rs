//! Query service backends and the session wiring built from configuration.

pub mod http;
pub mod wire;

use std::time::Duration;

use secrecy::SecretString;

use comanda_core::query::BoxQueryService;
use comanda_core::session::{SessionBlueprint, SessionOptions, SessionRegistry};
use comanda_types::config::{DashboardConfig, QueryServiceConfig};
use comanda_types::session::SessionKind;

use crate::config::resolve_timeout;

pub use http::HttpQueryService;

/// Upper bound for establishing a connection; the per-request deadline is
/// enforced by the session.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client for every query endpoint.
pub fn build_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("comanda/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Bearer token from the environment variable named in the config, if set
/// and non-empty.
pub fn api_key_from_env(config: &QueryServiceConfig) -> Option<SecretString> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(SecretString::from)
}

/// Session settings for `kind` as configured.
pub fn session_options(config: &DashboardConfig, kind: SessionKind) -> SessionOptions {
    let profile = config.profile(kind);
    SessionOptions {
        greeting: profile.greeting.clone(),
        failure_notice: profile.failure_notice.clone(),
        timeout: resolve_timeout(config, kind),
        context: profile.context.clone(),
    }
}

/// Blueprint for `kind` backed by the configured HTTP endpoint.
pub fn http_blueprint(
    config: &DashboardConfig,
    kind: SessionKind,
    client: reqwest::Client,
    api_key: Option<SecretString>,
) -> SessionBlueprint {
    let mut service =
        HttpQueryService::new(client, &config.query_service.base_url, config.profile(kind));
    if let Some(api_key) = api_key {
        service = service.with_api_key(api_key);
    }
    tracing::debug!(%kind, url = service.url(), "query endpoint configured");
    SessionBlueprint::new(kind, BoxQueryService::new(service), session_options(config, kind))
}

/// Registry with an HTTP-backed blueprint for every session kind.
pub fn build_registry(config: &DashboardConfig) -> Result<SessionRegistry, reqwest::Error> {
    let client = build_http_client()?;

    let registry = SessionKind::ALL
        .into_iter()
        .fold(SessionRegistry::new(), |registry, kind| {
            let api_key = api_key_from_env(&config.query_service);
            registry.with_blueprint(http_blueprint(config, kind, client.clone(), api_key))
        });
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::routing::post;
    use comanda_types::session::{FailureKind, MessageRole};
    use serde_json::{Value, json};

    #[test]
    fn options_follow_profile() {
        let mut config = DashboardConfig::default();
        config.analytics.timeout_ms = Some(45_000);
        config.analytics.context = json!({ "store_id": 3 });

        let options = session_options(&config, SessionKind::Analytics);
        assert_eq!(options.timeout, Duration::from_secs(45));
        assert_eq!(options.context["store_id"], 3);
        assert_eq!(options.greeting, config.analytics.greeting);

        let options = session_options(&config, SessionKind::Assistant);
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn api_key_env_unset_is_none() {
        let config = QueryServiceConfig {
            api_key_env: "COMANDA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..QueryServiceConfig::default()
        };
        assert!(api_key_from_env(&config).is_none());
    }

    #[tokio::test]
    async fn registry_sessions_talk_to_configured_backend() {
        async fn manager(Json(body): Json<Value>) -> Json<Value> {
            Json(json!({
                "content": format!("Here are the top SKUs for {}", body["store_id"]),
                "chart_available": true
            }))
        }

        let router = Router::new().route("/manager/ask", post(manager));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let mut config = DashboardConfig::default();
        config.query_service.base_url = format!("http://{addr}");
        config.analytics.context = json!({ "store_id": 3 });

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.kinds(), SessionKind::ALL.to_vec());

        let analytics = registry.open(SessionKind::Analytics).unwrap();
        analytics.submit("Top 10 SKUs by revenue");
        let snapshot = analytics.wait_idle().await;
        assert_eq!(snapshot.log.len(), 3);
        assert_eq!(snapshot.log[2].role, MessageRole::Assistant);
        assert_eq!(snapshot.log[2].content, "Here are the top SKUs for 3");
        assert!(snapshot.log[2].has_chart);

        // The assistant endpoint is not served: one fallback, back to idle.
        let assistant = registry.open(SessionKind::Assistant).unwrap();
        assistant.submit("hola");
        let snapshot = assistant.wait_idle().await;
        assert_eq!(snapshot.log.len(), 3);
        assert_eq!(
            snapshot.log[2].failure.as_ref().unwrap().kind,
            FailureKind::RequestFailed
        );
        assert!(!snapshot.awaiting_response);
    }
}
