//! End-to-end replay build: resample, project, synthesize, bundle.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use contracts::{ReplayConfig, ReplayData, ReplayError, Rgb, SessionData};
use ingestion::PerDriverResampler;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use track_geometry::{extract_drs_zones, fastest_reference_lap, TrackProjector};

use crate::engine::{DriverMeta, FrameSynthesizer, SynthesisInput};
use crate::flags::{build_flag_windows, shift_race_control};
use crate::weather::WeatherSeries;

/// Replay build pipeline
///
/// Owns its configuration; one instance may build any number of sessions.
#[derive(Debug, Clone)]
pub struct ReplayPipeline {
    config: ReplayConfig,
}

impl ReplayPipeline {
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Build a replay from one session.
    ///
    /// Fails fast with no partial output. `cancel` is observed between driver
    /// resamples and between stages.
    #[instrument(
        name = "replay_pipeline_build",
        skip(self, session, cancel),
        fields(
            event = %session.info.event_name,
            drivers = session.drivers.len(),
            fps = self.config.fps
        )
    )]
    pub async fn build(
        &self,
        session: SessionData,
        cancel: CancellationToken,
    ) -> Result<ReplayData, ReplayError> {
        let started = Instant::now();
        let SessionData {
            info: session_info,
            drivers,
            track_status,
            weather,
            race_control_messages,
            driver_colors,
            reference_lap,
        } = session;

        let reference = match reference_lap {
            Some(lap) if lap.points.len() >= 2 => Some(lap),
            _ => fastest_reference_lap(&drivers),
        };
        let metas: BTreeMap<String, DriverMeta> = drivers
            .iter()
            .map(|d| {
                (
                    d.code.clone(),
                    DriverMeta {
                        grid_position: d.grid_position,
                        dnf: d.dnf,
                    },
                )
            })
            .collect();

        // 1. Resample
        let resampler = PerDriverResampler::new(self.config.resampler.clone(), self.config.fps);
        let field = resampler.resample_field(drivers, &cancel).await?;
        observability::record_resample(field.tracks.len(), field.excluded.len(), field.timeline.len());
        ensure_active(&cancel)?;

        // 2. Project
        let reference = reference
            .ok_or_else(|| ReplayError::projection("session has no usable reference lap"))?;
        let projector = Arc::new(TrackProjector::new(
            &reference.polyline(),
            &self.config.projector,
        )?);
        ensure_active(&cancel)?;

        // 3. Synthesize
        let origin = field.timeline.origin_s;
        let flag_windows = build_flag_windows(&track_status, origin);
        let weather = WeatherSeries::new(&weather, origin);
        let synthesizer = FrameSynthesizer::new(self.config.synthesizer.clone(), Arc::clone(&projector));

        let (field, flag_windows, frames) = tokio::task::spawn_blocking(move || {
            let frames = synthesizer.synthesize(SynthesisInput {
                field: &field,
                flag_windows: &flag_windows,
                weather: weather.as_ref(),
                drivers: &metas,
            });
            (field, flag_windows, frames)
        })
        .await
        .map_err(|e| ReplayError::Other(format!("frame synthesis task failed: {e}")))?;
        let frames = frames?;
        ensure_active(&cancel)?;

        // 4. Bundle
        let driver_colors: BTreeMap<String, Rgb> = field
            .tracks
            .keys()
            .map(|code| {
                let color = driver_colors.get(code).and_then(|hex| {
                    let parsed = Rgb::from_hex(hex);
                    if parsed.is_none() {
                        warn!(driver = %code, color = %hex, "unparseable driver color");
                    }
                    parsed
                });
                (code.clone(), color.unwrap_or(Rgb::GREY))
            })
            .collect();

        let replay = ReplayData {
            info: session_info,
            fps: self.config.fps,
            frames,
            driver_colors,
            total_laps: field.total_laps(),
            track_length_m: projector.track_length(),
            flag_windows,
            drs_zones: extract_drs_zones(&reference.points),
            race_control_messages: shift_race_control(&race_control_messages, origin),
        };

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        observability::record_build_duration_ms(elapsed_ms);
        info!(
            frames = replay.frame_count(),
            total_laps = replay.total_laps,
            track_length_m = replay.track_length_m,
            excluded = field.excluded.len(),
            elapsed_ms,
            "replay built"
        );

        Ok(replay)
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), ReplayError> {
    if cancel.is_cancelled() {
        Err(ReplayError::Cancelled)
    } else {
        Ok(())
    }
}
