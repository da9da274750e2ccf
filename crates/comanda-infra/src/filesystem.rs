//! Data directory layout for Comanda.

use std::path::{Path, PathBuf};

use comanda_types::config::DashboardConfig;

/// Resolve the Comanda data directory.
///
/// Checks the `COMANDA_DATA_DIR` environment variable first, then falls back
/// to `~/.comanda`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COMANDA_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".comanda");
    }

    // Last resort: current directory
    PathBuf::from(".comanda")
}

/// Path of the config file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Fixture file location; relative paths are taken from `data_dir`.
pub fn fixtures_path(data_dir: &Path, config: &DashboardConfig) -> PathBuf {
    let path = Path::new(&config.fixtures_path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}
