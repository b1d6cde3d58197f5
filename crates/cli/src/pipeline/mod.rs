//! Build orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{BuildConfig, BuildJob};
pub use stats::BuildStats;
