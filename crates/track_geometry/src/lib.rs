//! # Track Geometry
//!
//! Reference polyline handling for the replay engine.
//!
//! - [`TrackProjector`]: densified, arc-length parametrized polyline with
//!   nearest-point projection backed by a static 2-d tree
//! - Winding detection, outward normals and track edges for renderers
//! - DRS zone extraction and reference lap selection
//!
//! ## Usage Example
//!
//! ```ignore
//! use track_geometry::{fastest_reference_lap, TrackProjector};
//!
//! let lap = fastest_reference_lap(&session.drivers).ok_or(...)?;
//! let projector = TrackProjector::new(&lap.polyline(), &config.projector)?;
//! let s = projector.project(x, y);
//! ```

mod drs;
mod kdtree;
mod projector;
mod reference;

pub use drs::{extract_drs_zones, DRS_OPEN_THRESHOLD};
pub use kdtree::KdTree;
pub use projector::{Bounds, TrackBoundaries, TrackProjector, Winding};
pub use reference::fastest_reference_lap;
