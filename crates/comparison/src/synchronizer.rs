//! MultiSessionSynchronizer: two replays on one playback axis.

use std::sync::Arc;

use contracts::{Frame, ReplayData, ReplayError, SyncMap, SyncMode, SyncPair};
use tracing::{info, instrument, warn};

use crate::metrics::{position_deltas, time_delta, ComparisonMetrics};
use crate::sync_map::{build_distance_map, build_lap_map, build_time_map};

/// Aligns two replays under one sync mode.
///
/// Changing the mode is the only state transition and always rebuilds the map.
/// When a mode cannot be served the map is empty and the reason is kept in
/// [`unavailable`](Self::unavailable).
#[derive(Debug)]
pub struct MultiSessionSynchronizer {
    a: Arc<ReplayData>,
    b: Arc<ReplayData>,
    mode: SyncMode,
    map: SyncMap,
    unavailable: Option<ReplayError>,
}

impl MultiSessionSynchronizer {
    pub fn new(a: Arc<ReplayData>, b: Arc<ReplayData>, mode: SyncMode) -> Self {
        let mut synchronizer = Self {
            a,
            b,
            mode,
            map: SyncMap::new(),
            unavailable: None,
        };
        synchronizer.rebuild();
        synchronizer
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Switch mode and rebuild the map
    pub fn set_mode(&mut self, mode: SyncMode) {
        self.mode = mode;
        self.rebuild();
    }

    pub fn sync_map(&self) -> &[SyncPair] {
        &self.map
    }

    /// Number of synchronized ticks
    pub fn total_frames(&self) -> usize {
        self.map.len()
    }

    /// Why the current mode produced no map
    pub fn unavailable(&self) -> Option<&ReplayError> {
        self.unavailable.as_ref()
    }

    pub fn session_a(&self) -> &ReplayData {
        &self.a
    }

    pub fn session_b(&self) -> &ReplayData {
        &self.b
    }

    #[instrument(
        name = "sync_map_build",
        skip(self),
        fields(
            mode = %self.mode,
            frames_a = self.a.frames.len(),
            frames_b = self.b.frames.len()
        )
    )]
    fn rebuild(&mut self) {
        let built = match self.mode {
            SyncMode::Lap => build_lap_map(&self.a, &self.b),
            SyncMode::Time => build_time_map(&self.a, &self.b),
            SyncMode::Distance => build_distance_map(&self.a, &self.b),
        };

        match built {
            Ok(map) => {
                info!(pairs = map.len(), "sync map built");
                self.map = map;
                self.unavailable = None;
            }
            Err(e) => {
                warn!(error = %e, "sync mode unavailable");
                self.map = SyncMap::new();
                self.unavailable = Some(e);
            }
        }
        observability::record_sync_map(self.mode, self.map.len());
    }

    /// Frames of A and B at playback `tick`, clamped to the last pair.
    ///
    /// `None` only when the map is empty.
    pub fn get_synchronized_frames(&self, tick: usize) -> Option<(&Frame, &Frame)> {
        let pair = self.map.get(tick.min(self.map.len().checked_sub(1)?))?;
        Some((self.a.frames.get(pair.frame_a)?, self.b.frames.get(pair.frame_b)?))
    }

    /// Approximate time delta for `driver` at `tick`; see [`time_delta`]
    pub fn time_delta(&self, tick: usize, driver: &str) -> Option<f64> {
        let (frame_a, frame_b) = self.get_synchronized_frames(tick)?;
        time_delta(frame_a, frame_b, driver)
    }

    /// Everything a comparison view shows for `tick`
    pub fn comparison_metrics(&self, tick: usize) -> Option<ComparisonMetrics> {
        let (frame_a, frame_b) = self.get_synchronized_frames(tick)?;
        let time_deltas = frame_a
            .drivers
            .keys()
            .filter_map(|code| Some((code.clone(), time_delta(frame_a, frame_b, code)?)))
            .collect();

        Some(ComparisonMetrics {
            tick: tick.min(self.map.len() - 1),
            mode: self.mode,
            lap_a: frame_a.lap,
            lap_b: frame_b.lap,
            time_a: frame_a.t,
            time_b: frame_b.t,
            leader_a: frame_a.leader().map(|(code, _)| code.clone()),
            leader_b: frame_b.leader().map(|(code, _)| code.clone()),
            position_deltas: position_deltas(frame_a, frame_b),
            time_deltas,
        })
    }
}
