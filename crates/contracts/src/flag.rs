//! Race-control track status and flag windows.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Track status as published by race control
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    Green,
    Yellow,
    SafetyCar,
    Red,
    VscDeployed,
    VscEnding,
    /// Any code without a known meaning, kept verbatim
    Unknown(String),
}

impl TrackStatus {
    /// Map a raw status code ("1", "2", "4", ...)
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => Self::Green,
            "2" => Self::Yellow,
            "4" => Self::SafetyCar,
            "5" => Self::Red,
            "6" => Self::VscDeployed,
            "7" => Self::VscEnding,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Raw status code
    pub fn code(&self) -> &str {
        match self {
            Self::Green => "1",
            Self::Yellow => "2",
            Self::SafetyCar => "4",
            Self::Red => "5",
            Self::VscDeployed => "6",
            Self::VscEnding => "7",
            Self::Unknown(code) => code,
        }
    }

    /// Whether the status neutralizes or interrupts racing
    pub fn is_caution(&self) -> bool {
        !matches!(self, Self::Green | Self::Unknown(_))
    }
}

impl fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Yellow => write!(f, "yellow"),
            Self::SafetyCar => write!(f, "safety car"),
            Self::Red => write!(f, "red"),
            Self::VscDeployed => write!(f, "vsc"),
            Self::VscEnding => write!(f, "vsc ending"),
            Self::Unknown(code) => write!(f, "status {code}"),
        }
    }
}

/// Raw status transition from the data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStatusEvent {
    /// Session time (seconds)
    pub time_s: f64,
    pub status_code: String,
}

/// Half-open interval `[start_s, end_s)` during which a status applies.
///
/// Times are relative to the replay timeline origin. The last window of a
/// session is open-ended (`end_s == None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagWindow {
    pub status: TrackStatus,
    pub start_s: f64,
    pub end_s: Option<f64>,
}

impl FlagWindow {
    pub fn new(status: TrackStatus, start_s: f64, end_s: Option<f64>) -> Self {
        Self {
            status,
            start_s,
            end_s,
        }
    }

    /// Whether `t` falls inside the window
    pub fn contains(&self, t: f64) -> bool {
        t >= self.start_s && self.end_s.map_or(true, |end| t < end)
    }
}
