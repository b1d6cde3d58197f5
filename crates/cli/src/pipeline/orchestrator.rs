//! Build orchestrator - load session, run the replay pipeline, write output.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{ReplayConfig, SessionSource};
use observability::BuildMetricsAggregator;
use sync_engine::ReplayPipeline;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::BuildStats;
use crate::error::CliError;
use crate::replay_io::write_replay;
use crate::session_source::JsonSessionSource;

/// Build job configuration
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Session dump to read
    pub session_path: PathBuf,

    /// Replay file to write
    pub output_path: PathBuf,

    /// Validated engine configuration
    pub replay_config: ReplayConfig,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// One replay build, from session file to replay file
pub struct BuildJob {
    config: BuildConfig,
}

impl BuildJob {
    /// Create a new build job with the given configuration
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Run the build to completion or cancellation
    pub async fn run(self, cancel: CancellationToken) -> Result<BuildStats> {
        let start_time = Instant::now();

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Load Session
        if !self.config.session_path.exists() {
            return Err(
                CliError::session_not_found(self.config.session_path.display().to_string()).into(),
            );
        }
        let mut source = JsonSessionSource::new(&self.config.session_path);
        info!(source = %source.describe(), "Loading session...");
        let session = source.load().await.context("Failed to load session")?;
        let drivers_in_session = session.drivers.len();
        let event_name = session.info.event_name.clone();

        info!(
            event = %event_name,
            drivers = drivers_in_session,
            "Session loaded"
        );

        // Build Replay
        let pipeline = ReplayPipeline::new(self.config.replay_config.clone());
        let replay = pipeline
            .build(session, cancel)
            .await
            .context("Replay build failed")?;

        let mut aggregator = BuildMetricsAggregator::new();
        for frame in &replay.frames {
            aggregator.update(frame);
        }

        let drivers_built = replay.driver_colors.len();
        if drivers_built < drivers_in_session {
            warn!(
                excluded = drivers_in_session - drivers_built,
                "Some drivers were excluded from the replay"
            );
        }

        // Write Output
        write_replay(&self.config.output_path, &replay).await?;
        info!(path = %self.config.output_path.display(), "Replay written");

        let stats = BuildStats {
            event_name,
            frames: replay.frame_count(),
            fps: replay.fps,
            drivers: drivers_built,
            drivers_excluded: drivers_in_session.saturating_sub(drivers_built),
            total_laps: replay.total_laps,
            track_length_m: replay.track_length_m,
            flag_windows: replay.flag_windows.len(),
            drs_zones: replay.drs_zones.len(),
            output_path: self.config.output_path.clone(),
            duration: start_time.elapsed(),
            frame_metrics: aggregator,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            frames = stats.frames,
            "Build complete"
        );

        Ok(stats)
    }
}
