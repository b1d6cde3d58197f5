//! Frame synthesis over the resampled field.

use std::collections::BTreeMap;
use std::sync::Arc;

use contracts::{
    DriverSnapshot, FlagWindow, Frame, ReplayError, ResampledField, ResampledTrack,
    SynthesizerConfig,
};
use indexmap::IndexMap;
use tracing::{debug, instrument};
use track_geometry::TrackProjector;

use crate::flags::active_status;
use crate::gap::{intervals, LeaderCurve};
use crate::ranking::{rank, RankEntry};
use crate::weather::WeatherSeries;

/// Per-driver classification data not carried by telemetry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverMeta {
    pub grid_position: Option<u32>,
    pub dnf: bool,
}

/// Everything one synthesis run reads
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub field: &'a ResampledField,
    pub flag_windows: &'a [FlagWindow],
    pub weather: Option<&'a WeatherSeries>,
    pub drivers: &'a BTreeMap<String, DriverMeta>,
}

/// Merges resampled tracks into ranked frames
///
/// Strictly sequential: frame `i` is built from tick `i` of every track.
#[derive(Debug, Clone)]
pub struct FrameSynthesizer {
    config: SynthesizerConfig,
    projector: Arc<TrackProjector>,
}

impl FrameSynthesizer {
    pub fn new(config: SynthesizerConfig, projector: Arc<TrackProjector>) -> Self {
        Self { config, projector }
    }

    pub fn projector(&self) -> &TrackProjector {
        &self.projector
    }

    /// Progress per tick: completed laps times track length plus the
    /// seam-reconciled projected in-lap distance
    pub fn progress(&self, track: &ResampledTrack) -> Vec<f64> {
        let length = self.projector.track_length();
        (0..track.len())
            .map(|i| {
                let completed = f64::from(track.lap[i].max(1) - 1);
                completed * length
                    + self.projector.project_in_lap(
                        track.x[i],
                        track.y[i],
                        track.relative_distance[i],
                    )
            })
            .collect()
    }

    /// Build one frame per timeline tick
    ///
    /// # Errors
    /// `NoValidDrivers` for an empty field, `InconsistentTimeline` for an
    /// empty timeline or tracks of a different length.
    #[instrument(
        name = "frame_synthesizer_run",
        skip(self, input),
        fields(
            drivers = input.field.tracks.len(),
            ticks = input.field.timeline.len()
        )
    )]
    pub fn synthesize(&self, input: SynthesisInput<'_>) -> Result<Vec<Frame>, ReplayError> {
        let field = input.field;
        let timeline = &field.timeline;
        if field.tracks.is_empty() {
            return Err(ReplayError::NoValidDrivers);
        }
        let inconsistent = ReplayError::InconsistentTimeline {
            start_s: timeline.origin_s,
            end_s: timeline.origin_s + timeline.duration(),
        };
        if timeline.is_empty() || field.tracks.values().any(|t| t.len() != timeline.len()) {
            return Err(inconsistent);
        }

        let tracks: Vec<&ResampledTrack> = field.tracks.values().collect();
        let metas: Vec<DriverMeta> = tracks
            .iter()
            .map(|t| input.drivers.get(&t.code).copied().unwrap_or_default())
            .collect();
        let progress: Vec<Vec<f64>> = tracks.iter().map(|t| self.progress(t)).collect();
        let finals: Vec<f64> = progress
            .iter()
            .map(|p| p.last().copied().unwrap_or(0.0))
            .collect();

        // reference leader: greatest final progress, first code on ties
        let mut reference = 0;
        for (d, &p) in finals.iter().enumerate() {
            if p > finals[reference] {
                reference = d;
            }
        }
        let times = timeline.times();
        let curve = LeaderCurve::new(&times, &progress[reference]);
        debug!(
            reference_leader = %tracks[reference].code,
            final_progress_m = finals[reference],
            "leader curve built"
        );

        let mut frames = Vec::with_capacity(timeline.len());
        for (i, &t) in times.iter().enumerate() {
            let entries: Vec<RankEntry<'_>> = tracks
                .iter()
                .enumerate()
                .map(|(d, track)| RankEntry {
                    code: &track.code,
                    progress_m: progress[d][i],
                    grid_position: metas[d].grid_position,
                })
                .collect();
            let leader_progress = entries
                .iter()
                .map(|e| e.progress_m)
                .fold(f64::NEG_INFINITY, f64::max);
            let order = rank(&entries, leader_progress < self.config.grid_order_threshold_m);

            let gaps: Vec<f64> = order
                .iter()
                .enumerate()
                .map(|(pos, &d)| {
                    if pos == 0 {
                        0.0
                    } else {
                        curve.gap(t, progress[d][i])
                    }
                })
                .collect();
            let intervals = intervals(&gaps);

            let mut drivers = IndexMap::with_capacity(order.len());
            for (pos, &d) in order.iter().enumerate() {
                let track = tracks[d];
                let p = progress[d][i];
                drivers.insert(
                    track.code.clone(),
                    DriverSnapshot {
                        x: track.x[i],
                        y: track.y[i],
                        lap: track.lap[i],
                        rel_dist: track.relative_distance[i].clamp(0.0, 1.0),
                        progress_m: p,
                        tyre: track.tyre_compound[i],
                        tyre_life: track.tyre_life_laps[i],
                        speed_kph: track.speed_kph[i],
                        gear: track.gear[i],
                        drs: track.drs_state[i],
                        throttle_pct: track.throttle_pct[i],
                        brake_pct: track.brake_pct[i],
                        gap_to_leader_s: gaps[pos],
                        interval_to_ahead_s: intervals[pos],
                        position: pos as u32 + 1,
                        is_out: metas[d].dnf && p >= finals[d] - self.config.out_epsilon_m,
                    },
                );
            }

            let lap = drivers.first().map(|(_, s)| s.lap).unwrap_or(1);
            let frame = Frame {
                t,
                lap,
                drivers,
                track_status: active_status(input.flag_windows, t).cloned(),
                weather: input.weather.map(|w| w.at(t)),
            };
            observability::record_frame_metrics(&frame, i);
            frames.push(frame);
        }

        metrics::counter!("replay_synthesis_runs_total").increment(1);
        Ok(frames)
    }
}
