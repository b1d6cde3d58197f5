//! Raw per-driver lap telemetry as handed over by the data-acquisition side.

use serde::{Deserialize, Serialize};

/// Tyre compound
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TyreCompound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    HyperSoft,
    UltraSoft,
    SuperSoft,
    #[default]
    #[serde(other)]
    Unknown,
}

impl TyreCompound {
    /// Parse the compound name used by timing feeds ("SOFT", "HYPERSOFT", ...)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Self::Soft,
            "MEDIUM" => Self::Medium,
            "HARD" => Self::Hard,
            "INTERMEDIATE" => Self::Intermediate,
            "WET" => Self::Wet,
            "HYPERSOFT" => Self::HyperSoft,
            "ULTRASOFT" => Self::UltraSoft,
            "SUPERSOFT" => Self::SuperSoft,
            _ => Self::Unknown,
        }
    }

    /// Stable integer code, -1 for unknown
    pub fn code(self) -> i8 {
        match self {
            Self::Soft => 0,
            Self::Medium => 1,
            Self::Hard => 2,
            Self::Intermediate => 3,
            Self::Wet => 4,
            Self::HyperSoft => 5,
            Self::UltraSoft => 6,
            Self::SuperSoft => 7,
            Self::Unknown => -1,
        }
    }
}

/// One telemetry row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    /// Session time (seconds), monotonic within a lap
    pub time_s: f64,
    pub x: f64,
    pub y: f64,
    /// In-lap distance (meters), resets to 0 every lap
    pub distance_m: f64,
    /// In-lap fraction (0..1)
    #[serde(default)]
    pub relative_distance: f64,
    #[serde(default)]
    pub speed_kph: f64,
    #[serde(default)]
    pub gear: u8,
    /// DRS state code, >= 10 means open
    #[serde(default)]
    pub drs_state: u8,
    #[serde(default)]
    pub throttle_pct: f64,
    /// Raw brake signal; scale is normalized by the resampler
    #[serde(default)]
    pub brake: f64,
}

/// Per-lap raw series for one driver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LapSample {
    /// Lap number (>= 1)
    pub lap_number: u32,
    #[serde(default)]
    pub tyre_compound: TyreCompound,
    /// Tyre age in laps
    #[serde(default)]
    pub tyre_life_laps: f64,
    pub telemetry: Vec<TelemetryPoint>,
}

impl LapSample {
    /// Lap duration derived from the first and last telemetry rows
    pub fn duration_s(&self) -> Option<f64> {
        match (self.telemetry.first(), self.telemetry.last()) {
            (Some(first), Some(last)) if self.telemetry.len() >= 2 => {
                Some(last.time_s - first.time_s)
            }
            _ => None,
        }
    }

    /// Final in-lap distance, the length this lap contributes to race distance
    pub fn final_distance_m(&self) -> f64 {
        self.telemetry.last().map(|p| p.distance_m).unwrap_or(0.0)
    }
}

/// One driver's complete input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverLaps {
    /// Three-letter driver code
    pub code: String,
    /// Laps ordered by lap number
    pub laps: Vec<LapSample>,
    /// Starting grid slot (1-based)
    #[serde(default)]
    pub grid_position: Option<u32>,
    /// Classified as not finished (retired, disqualified, ...)
    #[serde(default)]
    pub dnf: bool,
}

impl DriverLaps {
    /// Whether any lap carries at least one sample
    pub fn has_telemetry(&self) -> bool {
        self.laps.iter().any(|lap| !lap.telemetry.is_empty())
    }
}
