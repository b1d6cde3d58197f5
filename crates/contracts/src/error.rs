//! Layered error definitions
//!
//! Categorized by source: config / telemetry / timeline / geometry / comparison

use thiserror::Error;

use crate::SyncMode;

/// Unified error type
#[derive(Debug, Error)]
pub enum ReplayError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Telemetry Errors =====
    /// One driver has no usable laps. Non-fatal: the driver is excluded.
    #[error("missing telemetry for driver '{driver}': {message}")]
    MissingTelemetry { driver: String, message: String },

    /// Every driver was excluded
    #[error("no driver has usable telemetry")]
    NoValidDrivers,

    // ===== Timeline Errors =====
    /// Global time bounds are empty or inverted
    #[error("inconsistent timeline: start={start_s}s end={end_s}s")]
    InconsistentTimeline { start_s: f64, end_s: f64 },

    // ===== Geometry Errors =====
    /// Degenerate reference lap handed to the track projector
    #[error("track projection failure: {message}")]
    ProjectionFailure { message: String },

    // ===== Comparison Errors =====
    /// A sync mode was requested while the data it needs is absent
    #[error("sync mode {mode} unavailable: {message}")]
    SyncModeUnavailable { mode: SyncMode, message: String },

    // ===== General Errors =====
    /// Build cancelled by the caller
    #[error("replay build cancelled")]
    Cancelled,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ReplayError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create missing telemetry error
    pub fn missing_telemetry(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingTelemetry {
            driver: driver.into(),
            message: message.into(),
        }
    }

    /// Create projection failure
    pub fn projection(message: impl Into<String>) -> Self {
        Self::ProjectionFailure {
            message: message.into(),
        }
    }

    /// Create sync-mode-unavailable error
    pub fn sync_unavailable(mode: SyncMode, message: impl Into<String>) -> Self {
        Self::SyncModeUnavailable {
            mode,
            message: message.into(),
        }
    }

    /// Whether the pipeline may continue after this error.
    ///
    /// Only per-driver telemetry gaps are recoverable; everything else aborts the build.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingTelemetry { .. })
    }
}
