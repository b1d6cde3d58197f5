//! File-backed session source.

use std::path::PathBuf;

use contracts::{ReplayError, SessionData, SessionSource};
use tracing::debug;

/// Session dump stored as a single JSON document
#[derive(Debug, Clone)]
pub struct JsonSessionSource {
    path: PathBuf,
}

impl JsonSessionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionSource for JsonSessionSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    async fn load(&mut self) -> Result<SessionData, ReplayError> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Session file read");

        serde_json::from_slice(&bytes).map_err(|e| {
            ReplayError::Other(format!(
                "invalid session file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
