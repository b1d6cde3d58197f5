//! SyncMap - MultiSessionSynchronizer output
//!
//! Pairs of frame indices aligning two replays.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Alignment policy between two sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Same lap number, index-proportional inside the lap
    Lap,
    /// Nearest timestamp
    #[default]
    Time,
    /// Nearest leader progress
    Distance,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lap => write!(f, "lap"),
            Self::Time => write!(f, "time"),
            Self::Distance => write!(f, "distance"),
        }
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lap" => Ok(Self::Lap),
            "time" => Ok(Self::Time),
            "distance" => Ok(Self::Distance),
            other => Err(format!("unknown sync mode: {other}")),
        }
    }
}

/// One synchronized tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPair {
    pub frame_a: usize,
    pub frame_b: usize,
}

impl SyncPair {
    pub fn new(frame_a: usize, frame_b: usize) -> Self {
        Self { frame_a, frame_b }
    }
}

/// Ordered list of synchronized ticks
pub type SyncMap = Vec<SyncPair>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_mode_parse() {
        assert_eq!("LAP".parse::<SyncMode>(), Ok(SyncMode::Lap));
        assert_eq!("distance".parse::<SyncMode>(), Ok(SyncMode::Distance));
        assert!("sector".parse::<SyncMode>().is_err());
        assert_eq!(SyncMode::Time.to_string(), "time");
    }
}
