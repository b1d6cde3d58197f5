//! Replay and configuration file IO.

use std::path::Path;

use contracts::{ReplayConfig, ReplayData};
use tracing::debug;

use crate::error::{CliError, Result};

/// Load configuration, falling back to defaults when no path is given
pub fn load_config(path: Option<&Path>) -> Result<ReplayConfig> {
    let Some(path) = path else {
        debug!("No configuration file given, using defaults");
        return Ok(ReplayConfig::default());
    };
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }
    Ok(config_loader::ConfigLoader::load_from_path(path)?)
}

/// Read a replay written by `build`
pub async fn read_replay(path: &Path) -> Result<ReplayData> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CliError::replay_load(path.display().to_string(), e.to_string()))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| CliError::replay_load(path.display().to_string(), e.to_string()))
}

/// Write a replay as JSON, creating parent directories
pub async fn write_replay(path: &Path, replay: &ReplayData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let bytes = serde_json::to_vec(replay)
        .map_err(|e| CliError::replay_write(path.display().to_string(), e.to_string()))?;
    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| CliError::replay_write(path.display().to_string(), e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Replay written");
    Ok(())
}
