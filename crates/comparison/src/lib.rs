//! # Comparison
//!
//! Side-by-side playback of two replays.
//!
//! - [`MultiSessionSynchronizer`]: builds a SyncMap under LAP, TIME or
//!   DISTANCE alignment and serves synchronized frame pairs
//! - Per-tick position and time deltas for comparison views
//!
//! ## Usage Example
//!
//! ```ignore
//! use comparison::MultiSessionSynchronizer;
//! use contracts::SyncMode;
//!
//! let mut sync = MultiSessionSynchronizer::new(replay_a, replay_b, SyncMode::Distance);
//! if let Some(metrics) = sync.comparison_metrics(tick) {
//!     println!("lap {} vs {}", metrics.lap_a, metrics.lap_b);
//! }
//! sync.set_mode(SyncMode::Lap);
//! ```

mod metrics;
mod sync_map;
mod synchronizer;

pub use metrics::{position_deltas, time_delta, ComparisonMetrics};
pub use sync_map::{build_distance_map, build_lap_map, build_time_map};
pub use synchronizer::MultiSessionSynchronizer;
