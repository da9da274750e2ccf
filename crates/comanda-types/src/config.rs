//! Dashboard configuration types for Comanda.
//!
//! `DashboardConfig` represents the top-level `config.toml` that points the
//! query sessions at their backend and carries the per-surface copy.

use serde::{Deserialize, Serialize};

use crate::session::SessionKind;

/// Top-level configuration for the dashboard.
///
/// Loaded from `~/.comanda/config.toml`. All fields have sensible defaults
/// matching a backend running on `localhost:8000`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub query_service: QueryServiceConfig,

    #[serde(default = "SessionProfile::assistant_defaults")]
    pub assistant: SessionProfile,

    #[serde(default = "SessionProfile::analytics_defaults")]
    pub analytics: SessionProfile,

    #[serde(default)]
    pub server: ServerConfig,

    /// Fixture file with customers, menu items and reservations.
    /// Relative paths are resolved against the data directory.
    #[serde(default = "default_fixtures_path")]
    pub fixtures_path: String,
}

fn default_fixtures_path() -> String {
    "fixtures.toml".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            query_service: QueryServiceConfig::default(),
            assistant: SessionProfile::assistant_defaults(),
            analytics: SessionProfile::analytics_defaults(),
            server: ServerConfig::default(),
            fixtures_path: default_fixtures_path(),
        }
    }
}

impl DashboardConfig {
    /// Profile for the given session kind.
    pub fn profile(&self, kind: SessionKind) -> &SessionProfile {
        match kind {
            SessionKind::Assistant => &self.assistant,
            SessionKind::Analytics => &self.analytics,
        }
    }
}

/// Connection settings shared by every session kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Name of the environment variable holding an optional bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_api_key_env() -> String {
    "COMANDA_QUERY_API_KEY".to_string()
}

impl Default for QueryServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Per-surface settings: which endpoint to call and what copy to show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProfile {
    /// Path appended to the query service base URL.
    pub endpoint: String,

    /// JSON field carrying the prompt in the request body.
    #[serde(default = "default_prompt_field")]
    pub prompt_field: String,

    /// Seeded assistant message every new session starts with.
    pub greeting: String,

    /// Label shown while a response is pending.
    #[serde(default = "default_pending_label")]
    pub pending_label: String,

    /// Content of the fallback message appended after a failed request.
    #[serde(default = "default_failure_notice")]
    pub failure_notice: String,

    /// Overrides `query_service.timeout_ms` for this surface.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Opaque metadata merged into every request body.
    #[serde(default = "empty_context")]
    pub context: serde_json::Value,
}

fn default_prompt_field() -> String {
    "prompt".to_string()
}

fn default_pending_label() -> String {
    "Escribiendo...".to_string()
}

fn default_failure_notice() -> String {
    "Lo siento, no pude obtener una respuesta. Intenta de nuevo en un momento.".to_string()
}

fn empty_context() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl SessionProfile {
    pub fn assistant_defaults() -> Self {
        Self {
            endpoint: "/chat".to_string(),
            prompt_field: "message".to_string(),
            greeting: "¡Hola! Soy tu asistente de restaurante. ¿Cómo puedo ayudarte hoy?"
                .to_string(),
            pending_label: default_pending_label(),
            failure_notice: default_failure_notice(),
            timeout_ms: None,
            context: empty_context(),
        }
    }

    pub fn analytics_defaults() -> Self {
        Self {
            endpoint: "/manager/ask".to_string(),
            prompt_field: default_prompt_field(),
            greeting: "¡Hola! Soy tu asistente de analytics. Puedes preguntarme sobre revenue, \
                       SKUs, meseros y más. Por ejemplo: 'Top 10 SKUs por revenue para store_id=3'"
                .to_string(),
            pending_label: "Analizando...".to_string(),
            failure_notice: default_failure_notice(),
            timeout_ms: None,
            context: empty_context(),
        }
    }
}

/// HTTP server bind settings for `comanda serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_config_default_values() {
        let config = DashboardConfig::default();
        assert_eq!(config.query_service.base_url, "http://localhost:8000");
        assert_eq!(config.query_service.timeout_ms, 30_000);
        assert_eq!(config.assistant.endpoint, "/chat");
        assert_eq!(config.assistant.prompt_field, "message");
        assert_eq!(config.analytics.endpoint, "/manager/ask");
        assert_eq!(config.analytics.prompt_field, "prompt");
        assert_eq!(config.analytics.pending_label, "Analizando...");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_dashboard_config_deserialize_with_defaults() {
        let config: DashboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.assistant.endpoint, "/chat");
        assert!(config.assistant.greeting.starts_with("¡Hola!"));
        assert_eq!(config.fixtures_path, "fixtures.toml");
        assert!(config.analytics.context.as_object().unwrap().is_empty());
    }

    #[test]
    fn test_dashboard_config_deserialize_with_values() {
        let toml_str = r#"
[query_service]
base_url = "https://ops.example.com"
timeout_ms = 5000

[assistant]
endpoint = "/v2/chat"
prompt_field = "message"
greeting = "Hello!"
timeout_ms = 2000

[assistant.context]
customer_id = "user_123"

[assistant.context.user_data]
name = "Usuario"
phone = "+1234567890"
"#;
        let config: DashboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.query_service.base_url, "https://ops.example.com");
        assert_eq!(config.query_service.api_key_env, "COMANDA_QUERY_API_KEY");
        assert_eq!(config.assistant.endpoint, "/v2/chat");
        assert_eq!(config.assistant.greeting, "Hello!");
        assert_eq!(config.assistant.timeout_ms, Some(2000));
        assert_eq!(config.assistant.pending_label, "Escribiendo...");
        assert_eq!(config.assistant.context["customer_id"], "user_123");
        assert_eq!(config.assistant.context["user_data"]["name"], "Usuario");
        // Untouched surface keeps its defaults.
        assert_eq!(config.analytics.endpoint, "/manager/ask");
    }

    #[test]
    fn test_profile_lookup_by_kind() {
        let config = DashboardConfig::default();
        assert_eq!(config.profile(SessionKind::Assistant).endpoint, "/chat");
        assert_eq!(config.profile(SessionKind::Analytics).endpoint, "/manager/ask");
    }
}
