//! SessionData - input bundle produced by a session source

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{DriverLaps, ReferenceLap, TrackStatusEvent};

/// Session identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub round: Option<u16>,
    /// "R", "Q", "S", ...
    #[serde(default)]
    pub session_kind: String,
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Neutral color for drivers without a team color
    pub const GREY: Rgb = Rgb(128, 128, 128);

    /// Parse "#RRGGBB" or "RRGGBB"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Raw weather row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Session time (seconds)
    pub time_s: f64,
    pub track_temp_c: f64,
    pub air_temp_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub wind_direction_deg: f64,
    pub rainfall: bool,
}

/// Race-control message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceControlMessage {
    /// Session time on input, timeline-relative time on output
    pub time_s: f64,
    #[serde(default)]
    pub category: String,
    pub message: String,
    #[serde(default)]
    pub flag: Option<String>,
}

/// Everything the engine needs to build one replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub info: SessionInfo,
    pub drivers: Vec<DriverLaps>,
    #[serde(default)]
    pub track_status: Vec<TrackStatusEvent>,
    #[serde(default)]
    pub weather: Vec<WeatherSample>,
    #[serde(default)]
    pub race_control_messages: Vec<RaceControlMessage>,
    /// Driver code -> "#RRGGBB"
    #[serde(default)]
    pub driver_colors: BTreeMap<String, String>,
    /// Explicit reference lap; the fastest lap is used when absent
    #[serde(default)]
    pub reference_lap: Option<ReferenceLap>,
}
