//! Replay engine configuration contracts shared across crates.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::SyncMode;

/// Replay engine configuration
///
/// Every field has a default, so an empty TOML document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ReplayConfig {
    /// Frames per second of the replay timeline
    #[validate(range(min = 1, max = 240))]
    pub fps: u32,

    /// Resampler configuration
    #[validate(nested)]
    pub resampler: ResamplerConfig,

    /// Track projector configuration
    #[validate(nested)]
    pub projector: ProjectorConfig,

    /// Frame synthesizer configuration
    #[validate(nested)]
    pub synthesizer: SynthesizerConfig,

    /// Comparison configuration
    pub comparison: ComparisonConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            fps: 25,
            resampler: ResamplerConfig::default(),
            projector: ProjectorConfig::default(),
            synthesizer: SynthesizerConfig::default(),
            comparison: ComparisonConfig::default(),
        }
    }
}

impl ReplayConfig {
    /// Tick spacing in seconds
    pub fn dt(&self) -> f64 {
        1.0 / f64::from(self.fps.max(1))
    }
}

/// Scale of the raw brake channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrakeScale {
    /// Fractional when the driver's brake never exceeds 1.0, percent otherwise
    #[default]
    Auto,
    /// 0..1 (or on/off)
    Fraction,
    /// 0..100
    Percent,
}

/// Resampler configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ResamplerConfig {
    pub brake_scale: BrakeScale,
    /// Upper bound on worker threads (None = min(cores, drivers))
    #[validate(range(min = 1))]
    pub max_workers: Option<usize>,
}

/// Track projector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Number of points of the densified reference polyline
    #[validate(range(min = 2, max = 1_000_000))]
    pub dense_points: usize,
    /// Track width used for boundary offsets (session units)
    #[validate(range(min = 0.0))]
    pub track_width: f64,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            dense_points: 4000,
            track_width: 200.0,
        }
    }
}

/// Frame synthesizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Leader progress below which cars are ordered by grid slot (meters)
    #[validate(range(min = 0.0))]
    pub grid_order_threshold_m: f64,
    /// Distance to final progress under which a DNF car counts as stopped (meters)
    #[validate(range(min = 0.0))]
    pub out_epsilon_m: f64,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            grid_order_threshold_m: 200.0,
            out_epsilon_m: 0.5,
        }
    }
}

/// Comparison configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub default_mode: SyncMode,
}
