//! PerDriverResampler main entry

use std::collections::BTreeMap;
use std::sync::Arc;

use contracts::{DriverLaps, ReplayError, ResampledField, ResamplerConfig};
use metrics::counter;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::config::{worker_count, IngestionMetrics};
use crate::pool::parallel_map;
use crate::resample::resample;
use crate::timeline::{global_timeline, DriverTimeline};

/// Per-driver resampler
///
/// Turns every driver's raw laps into a track on one shared uniform timeline.
/// Drivers are processed on a bounded worker pool and merged by driver code.
pub struct PerDriverResampler {
    config: ResamplerConfig,
    fps: u32,
    metrics: Arc<IngestionMetrics>,
}

impl PerDriverResampler {
    /// Create a resampler producing `fps` ticks per second
    pub fn new(config: ResamplerConfig, fps: u32) -> Self {
        Self {
            config,
            fps,
            metrics: Arc::new(IngestionMetrics::new()),
        }
    }

    /// Shared metrics handle
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Resample every driver onto the global timeline.
    ///
    /// Drivers without usable telemetry are excluded and listed in
    /// `ResampledField::excluded`; they do not affect the time bounds.
    ///
    /// # Errors
    /// - `NoValidDrivers` when every driver is excluded
    /// - `InconsistentTimeline` when the global bounds are empty
    /// - `Cancelled` when `cancel` fires between driver resamples
    #[instrument(
        name = "resampler_resample_field",
        skip(self, drivers, cancel),
        fields(drivers = drivers.len(), fps = self.fps)
    )]
    pub async fn resample_field(
        &self,
        drivers: Vec<DriverLaps>,
        cancel: &CancellationToken,
    ) -> Result<ResampledField, ReplayError> {
        let workers = worker_count(drivers.len(), self.config.max_workers);
        self.metrics.update_workers(workers);

        let brake_scale = self.config.brake_scale;
        let built = parallel_map(drivers, workers, cancel, move |driver| {
            DriverTimeline::from_laps(&driver, brake_scale).map_err(|e| (driver.code, e))
        })
        .await?;

        let mut timelines = Vec::with_capacity(built.len());
        let mut excluded = Vec::new();
        for result in built {
            match result {
                Ok(timeline) => {
                    self.metrics.record_duplicates(timeline.duplicates_dropped);
                    timelines.push(timeline);
                }
                Err((code, e)) if e.is_recoverable() => {
                    warn!(driver = %code, error = %e, "driver excluded from replay");
                    counter!("replay_drivers_excluded_total").increment(1);
                    self.metrics.record_excluded();
                    excluded.push(code);
                }
                Err((_, e)) => return Err(e),
            }
        }

        let timeline = global_timeline(&timelines, self.fps)?;

        let tracks = parallel_map(timelines, workers, cancel, move |driver| {
            resample(&driver, &timeline)
        })
        .await?;

        let mut merged = BTreeMap::new();
        for track in tracks {
            self.metrics.record_resampled();
            if let Some(previous) = merged.insert(track.code.clone(), track) {
                warn!(driver = %previous.code, "duplicate driver code, keeping the later entry");
            }
        }
        counter!("replay_drivers_resampled_total").increment(merged.len() as u64);
        excluded.sort();

        info!(
            drivers = merged.len(),
            excluded = excluded.len(),
            ticks = timeline.len(),
            workers,
            "resampling completed"
        );

        Ok(ResampledField {
            timeline,
            tracks: merged,
            excluded,
        })
    }
}
