//! Track geometry data shared between the projector and renderers.

use serde::{Deserialize, Serialize};

/// Planar point in session coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
}

impl TrackPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One sample of the reference lap
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub drs_state: u8,
}

/// Reference lap used to build the track polyline and DRS zones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLap {
    /// Driver the lap was taken from, if known
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub lap_number: Option<u32>,
    pub points: Vec<ReferencePoint>,
}

impl ReferenceLap {
    /// Polyline of the lap
    pub fn polyline(&self) -> Vec<TrackPoint> {
        self.points
            .iter()
            .map(|p| TrackPoint::new(p.x, p.y))
            .collect()
    }
}

/// Contiguous reference-lap index range where DRS is open
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrsZone {
    pub start_index: usize,
    pub end_index: usize,
    pub start: TrackPoint,
    pub end: TrackPoint,
}
