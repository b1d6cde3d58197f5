//! # Ingestion
//!
//! Per-driver telemetry resampling.
//!
//! Responsibilities:
//! - Concatenate each driver's laps with accumulated race distance
//! - Deduplicate lap-boundary timestamps (later lap wins)
//! - Normalize the brake channel to 0..100
//! - Resample onto one uniform global timeline on a bounded worker pool
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::PerDriverResampler;
//! use tokio_util::sync::CancellationToken;
//!
//! let resampler = PerDriverResampler::new(config.resampler.clone(), config.fps);
//! let field = resampler.resample_field(session.drivers, &CancellationToken::new()).await?;
//! for (code, track) in &field.tracks {
//!     println!("{code}: {} ticks", track.len());
//! }
//! ```

mod config;
mod error;
mod pool;
mod resample;
mod resampler;
mod timeline;

// Re-exports
pub use config::{worker_count, IngestionMetrics, MetricsSnapshot};
pub use contracts::{ResampledField, ResampledTrack, Timeline};
pub use error::{IngestionError, Result};
pub use pool::parallel_map;
pub use resample::resample;
pub use resampler::PerDriverResampler;
pub use timeline::{global_timeline, DriverTimeline, TimelineSample};
