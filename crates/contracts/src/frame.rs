//! Frame - FrameSynthesizer output
//!
//! One frame per timeline tick, drivers ordered by current ranking.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{DrsZone, FlagWindow, RaceControlMessage, Rgb, SessionInfo, TrackStatus, TyreCompound};

/// One driver's state at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSnapshot {
    pub x: f64,
    pub y: f64,
    pub lap: u32,
    /// In-lap fraction (0..1)
    pub rel_dist: f64,
    /// Ranking metric: completed laps times track length plus projected in-lap distance
    pub progress_m: f64,
    pub tyre: TyreCompound,
    pub tyre_life: f64,
    pub speed_kph: f64,
    pub gear: u8,
    pub drs: u8,
    pub throttle_pct: f64,
    pub brake_pct: f64,
    /// Seconds behind the leader, >= 0
    pub gap_to_leader_s: f64,
    /// Seconds behind the car ahead, >= 0
    pub interval_to_ahead_s: f64,
    /// 1-based position
    pub position: u32,
    pub is_out: bool,
}

/// Rain state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RainState {
    #[default]
    Dry,
    Raining,
}

/// Weather interpolated onto a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub track_temp_c: f64,
    pub air_temp_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: f64,
    pub rain_state: RainState,
}

/// Synthesized frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Relative time (seconds)
    pub t: f64,
    /// Leader's lap
    pub lap: u32,
    /// driver code -> snapshot, iteration order == ranking order
    pub drivers: IndexMap<String, DriverSnapshot>,
    /// Active track status
    #[serde(default)]
    pub track_status: Option<TrackStatus>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
}

impl Frame {
    /// Code and snapshot of the car in P1
    pub fn leader(&self) -> Option<(&String, &DriverSnapshot)> {
        self.drivers.first()
    }

    /// Leader progress expressed in laps
    pub fn leader_progress_laps(&self, track_length_m: f64) -> f64 {
        match self.leader() {
            Some((_, snapshot)) if track_length_m > 0.0 => snapshot.progress_m / track_length_m,
            _ => 0.0,
        }
    }
}

/// Kind of timeline event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceEventKind {
    Dnf,
    YellowFlag,
    SafetyCar,
    RedFlag,
    Vsc,
    /// The labelled driver moved ahead of `overtaken`
    Overtake { overtaken: String },
    PitStop,
}

/// Event marker for a progress bar or event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEvent {
    pub kind: RaceEventKind,
    pub frame: usize,
    /// Last frame covered by a flag event
    #[serde(default)]
    pub end_frame: Option<usize>,
    pub lap: u32,
    pub label: String,
}

/// Replay output bundle
///
/// Identical schema whether freshly built or reloaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayData {
    #[serde(default)]
    pub info: SessionInfo,
    pub fps: u32,
    pub frames: Vec<Frame>,
    pub driver_colors: BTreeMap<String, Rgb>,
    pub total_laps: u32,
    pub track_length_m: f64,
    pub flag_windows: Vec<FlagWindow>,
    #[serde(default)]
    pub drs_zones: Vec<DrsZone>,
    #[serde(default)]
    pub race_control_messages: Vec<RaceControlMessage>,
}

impl ReplayData {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Timestamp of the last frame
    pub fn max_time(&self) -> f64 {
        self.frames.last().map(|f| f.t).unwrap_or(0.0)
    }
}
