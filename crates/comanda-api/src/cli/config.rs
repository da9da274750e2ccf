//! `comanda config`: show where data lives and the effective settings.

use console::style;

use comanda_infra::filesystem::{config_path, fixtures_path};

use crate::state::AppState;

pub async fn show_config(state: &AppState, json: bool) -> anyhow::Result<()> {
    let config_file = config_path(&state.data_dir);
    let fixtures_file = fixtures_path(&state.data_dir, &state.config);
    let api_key_set = std::env::var(&state.config.query_service.api_key_env)
        .is_ok_and(|key| !key.trim().is_empty());

    if json {
        let out = serde_json::json!({
            "data_dir": state.data_dir,
            "config_file": config_file,
            "config_file_exists": config_file.exists(),
            "fixtures_file": fixtures_file,
            "api_key_set": api_key_set,
            "config": &*state.config,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let found = |exists: bool| {
        if exists {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗ (defaults)").yellow())
        }
    };

    println!();
    println!("  {}  {}", style("Data dir:").bold(), state.data_dir.display());
    println!(
        "  {}    {} {}",
        style("Config:").bold(),
        config_file.display(),
        found(config_file.exists())
    );
    println!(
        "  {}  {} {}",
        style("Fixtures:").bold(),
        fixtures_file.display(),
        found(fixtures_file.exists())
    );
    println!(
        "  {}   {} {}",
        style("API key:").bold(),
        state.config.query_service.api_key_env,
        if api_key_set {
            format!("{}", style("set").green())
        } else {
            format!("{}", style("unset").dim())
        }
    );
    println!();
    println!("{}", toml::to_string_pretty(&*state.config)?);
    Ok(())
}
