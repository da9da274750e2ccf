//! Dashboard configuration loader for Comanda.
//!
//! Reads `config.toml` from the data directory (`~/.comanda/` in production)
//! and deserializes it into [`DashboardConfig`]. Falls back to defaults when
//! the file is missing or malformed.

use std::path::Path;
use std::time::Duration;

use comanda_types::config::DashboardConfig;
use comanda_types::session::SessionKind;

/// Minimum per-request timeout (safety floor).
pub const MIN_TIMEOUT_MS: u64 = 1_000;

/// Load dashboard configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`DashboardConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_dashboard_config(data_dir: &Path) -> DashboardConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return DashboardConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return DashboardConfig::default();
        }
    };

    match toml::from_str::<DashboardConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            DashboardConfig::default()
        }
    }
}

/// Resolve the request timeout for a session kind.
///
/// Priority:
/// 1. Per-surface override (`[assistant] timeout_ms` / `[analytics] timeout_ms`)
/// 2. `query_service.timeout_ms`
///
/// A floor of one second is enforced regardless of source.
pub fn resolve_timeout(config: &DashboardConfig, kind: SessionKind) -> Duration {
    let millis = config
        .profile(kind)
        .timeout_ms
        .unwrap_or(config.query_service.timeout_ms);
    Duration::from_millis(millis.max(MIN_TIMEOUT_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_dashboard_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_dashboard_config(tmp.path()).await;
        assert_eq!(config.query_service.base_url, "http://localhost:8000");
        assert_eq!(config.assistant.endpoint, "/chat");
        assert_eq!(config.analytics.endpoint, "/manager/ask");
    }

    #[tokio::test]
    async fn load_dashboard_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[query_service]
base_url = "http://api.internal:9000"
timeout_ms = 10000

[analytics]
endpoint = "/v2/ask"
greeting = "Hola gerente"
timeout_ms = 60000

[analytics.context]
store_id = 3
"#,
        )
        .await
        .unwrap();

        let config = load_dashboard_config(tmp.path()).await;
        assert_eq!(config.query_service.base_url, "http://api.internal:9000");
        assert_eq!(config.analytics.endpoint, "/v2/ask");
        assert_eq!(config.analytics.context["store_id"], 3);
        // Untouched sections keep their defaults.
        assert_eq!(config.assistant.prompt_field, "message");
    }

    #[tokio::test]
    async fn load_dashboard_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_dashboard_config(tmp.path()).await;
        assert_eq!(config.query_service.timeout_ms, 30_000);
    }

    #[test]
    fn example_config_parses() {
        let config: DashboardConfig =
            toml::from_str(include_str!("../../../config.example.toml")).unwrap();
        assert_eq!(config.assistant.context["customer_id"], "user_123");
        assert_eq!(config.assistant.context["user_data"]["phone"], "+1234567890");
        assert_eq!(
            resolve_timeout(&config, SessionKind::Analytics),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn resolve_timeout_prefers_profile_override() {
        let mut config = DashboardConfig::default();
        config.query_service.timeout_ms = 10_000;
        config.analytics.timeout_ms = Some(60_000);

        assert_eq!(
            resolve_timeout(&config, SessionKind::Analytics),
            Duration::from_secs(60)
        );
        assert_eq!(
            resolve_timeout(&config, SessionKind::Assistant),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn resolve_timeout_enforces_minimum() {
        let mut config = DashboardConfig::default();
        config.query_service.timeout_ms = 10;
        assert_eq!(
            resolve_timeout(&config, SessionKind::Assistant),
            Duration::from_millis(MIN_TIMEOUT_MS)
        );
    }
}
