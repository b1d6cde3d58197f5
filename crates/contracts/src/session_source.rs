//! SessionSource trait - data-acquisition collaborator
//!
//! Producers of archived sessions (file dumps, caches, provider clients)
//! implement this trait; the replay pipeline only consumes `SessionData`.

use crate::{ReplayError, SessionData};

/// Archived session provider
#[trait_variant::make(SessionSource: Send)]
pub trait LocalSessionSource {
    /// Human-readable origin (used for logging)
    fn describe(&self) -> String;

    /// Load the complete session
    ///
    /// # Errors
    /// Returns IO or parse errors with context
    async fn load(&mut self) -> Result<SessionData, ReplayError>;
}
