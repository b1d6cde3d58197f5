//! Per-tick comparison metrics.

use std::collections::BTreeMap;

use contracts::{Frame, SyncMode};
use serde::{Deserialize, Serialize};

/// Below this mean speed (m/s) a time delta is not meaningful
const MIN_MEAN_SPEED_MPS: f64 = 1.0;

/// Comparison view data for one synchronized tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub tick: usize,
    pub mode: SyncMode,
    pub lap_a: u32,
    pub lap_b: u32,
    pub time_a: f64,
    pub time_b: f64,
    pub leader_a: Option<String>,
    pub leader_b: Option<String>,
    /// Position in B minus position in A; positive means better placed in A
    pub position_deltas: BTreeMap<String, i64>,
    /// Seconds driver in A is ahead of itself in B
    pub time_deltas: BTreeMap<String, f64>,
}

/// Position change from A to B for every driver present in both frames
pub fn position_deltas(a: &Frame, b: &Frame) -> BTreeMap<String, i64> {
    a.drivers
        .iter()
        .filter_map(|(code, snapshot_a)| {
            let snapshot_b = b.drivers.get(code)?;
            Some((
                code.clone(),
                i64::from(snapshot_b.position) - i64::from(snapshot_a.position),
            ))
        })
        .collect()
}

/// Progress difference (A - B) divided by the driver's mean speed over both
/// frames.
///
/// An approximation, not a lap-time delta. `None` when the driver is missing
/// from either frame or nearly stationary.
pub fn time_delta(a: &Frame, b: &Frame, driver: &str) -> Option<f64> {
    let snapshot_a = a.drivers.get(driver)?;
    let snapshot_b = b.drivers.get(driver)?;
    let mean_speed_mps = (snapshot_a.speed_kph + snapshot_b.speed_kph) / 2.0 / 3.6;
    if !mean_speed_mps.is_finite() || mean_speed_mps < MIN_MEAN_SPEED_MPS {
        return None;
    }
    Some((snapshot_a.progress_m - snapshot_b.progress_m) / mean_speed_mps)
}
