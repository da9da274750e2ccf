//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST
//! API. The catalog service is generic over its source; AppState pins it to
//! the fixture-backed implementation.

use std::path::PathBuf;
use std::sync::Arc;

use comanda_core::catalog::CatalogService;
use comanda_core::session::SessionRegistry;
use comanda_infra::config::load_dashboard_config;
use comanda_infra::filesystem::{fixtures_path, resolve_data_dir};
use comanda_infra::fixtures::FixtureCatalog;
use comanda_infra::query::build_registry;
use comanda_types::config::DashboardConfig;

pub type ConcreteCatalogService = CatalogService<FixtureCatalog>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DashboardConfig>,
    pub data_dir: PathBuf,
    pub sessions: Arc<SessionRegistry>,
    pub catalog: Arc<ConcreteCatalogService>,
}

impl AppState {
    /// Initialize the application state: load config and fixtures, wire
    /// the query sessions.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_dashboard_config(&data_dir).await;
        let sessions = build_registry(&config)?;
        let catalog = FixtureCatalog::load(&fixtures_path(&data_dir, &config)).await?;

        Ok(Self::from_parts(config, data_dir, sessions, catalog))
    }

    pub fn from_parts(
        config: DashboardConfig,
        data_dir: PathBuf,
        sessions: SessionRegistry,
        catalog: FixtureCatalog,
    ) -> Self {
        Self {
            config: Arc::new(config),
            data_dir,
            sessions: Arc::new(sessions),
            catalog: Arc::new(CatalogService::new(catalog)),
        }
    }
}
