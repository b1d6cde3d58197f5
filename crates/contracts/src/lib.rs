//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the replay engine.
//! Business crates depend only on this crate; reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Raw telemetry carries session time in seconds (f64)
//! - The replay timeline is uniform: tick `i` sits at `i * dt` seconds after the
//!   earliest sample of the session (`Timeline::origin`)
//! - Frames are strictly ordered by tick

mod error;
mod flag;
mod frame;
mod replay_config;
mod session;
mod session_source;
mod sync;
mod telemetry;
mod timeline;
mod track;

pub use error::*;
pub use flag::*;
pub use frame::*;
pub use replay_config::*;
pub use session::*;
pub use session_source::{LocalSessionSource, SessionSource};
pub use sync::*;
pub use telemetry::*;
pub use timeline::*;
pub use track::*;
