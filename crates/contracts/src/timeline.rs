//! Uniform replay timeline and resampled per-driver tracks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::TyreCompound;

/// Shared uniform timeline
///
/// Tick `i` sits at relative time `i * dt`; `origin_s` is the session time of tick 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub origin_s: f64,
    pub dt: f64,
    pub len: usize,
}

impl Timeline {
    pub fn new(origin_s: f64, dt: f64, len: usize) -> Self {
        Self { origin_s, dt, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Relative time of tick `i`
    pub fn time_at(&self, i: usize) -> f64 {
        i as f64 * self.dt
    }

    /// Session time of tick `i`
    pub fn session_time_at(&self, i: usize) -> f64 {
        self.origin_s + self.time_at(i)
    }

    /// Convert a session time into timeline-relative time
    pub fn relative(&self, session_time_s: f64) -> f64 {
        session_time_s - self.origin_s
    }

    /// Relative time of the last tick
    pub fn duration(&self) -> f64 {
        self.time_at(self.len.saturating_sub(1))
    }

    /// Relative times of every tick
    pub fn times(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.time_at(i)).collect()
    }
}

/// One driver's telemetry on the shared timeline.
///
/// Continuous channels are linearly interpolated, discrete channels carry the
/// nearest preceding sample. All columns have `timeline.len` entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResampledTrack {
    pub code: String,

    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Accumulated race distance (meters)
    pub race_distance: Vec<f64>,
    /// Lap fraction relative to `lap`; may run past 1 between the line
    /// crossing and the first sample of the next lap
    pub relative_distance: Vec<f64>,
    pub speed_kph: Vec<f64>,
    pub throttle_pct: Vec<f64>,
    /// Brake (0..100)
    pub brake_pct: Vec<f64>,

    pub gear: Vec<u8>,
    pub drs_state: Vec<u8>,
    pub tyre_compound: Vec<TyreCompound>,
    pub tyre_life_laps: Vec<f64>,
    pub lap: Vec<u32>,

    /// Relative time of the driver's last real sample
    pub last_sample_s: f64,
}

impl ResampledTrack {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Highest lap number reached
    pub fn max_lap(&self) -> u32 {
        self.lap.iter().copied().max().unwrap_or(0)
    }
}

/// Output of the resampling stage: every usable driver on one timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledField {
    pub timeline: Timeline,
    /// Ordered by driver code
    pub tracks: BTreeMap<String, ResampledTrack>,
    /// Drivers dropped for missing telemetry
    pub excluded: Vec<String>,
}

impl ResampledField {
    /// Highest lap number across the field
    pub fn total_laps(&self) -> u32 {
        self.tracks
            .values()
            .map(ResampledTrack::max_lap)
            .max()
            .unwrap_or(0)
    }
}
