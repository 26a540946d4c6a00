// crates/consult-core/src/interfaces/mod.rs
// ============================================================================
// Module: Consult Interfaces
// Description: Backend-agnostic interface for session state storage.
// Purpose: Define the persistence seam used by the session manager.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Persistence technology is an external concern with its own consistency
//! contract (load, then validate, then serve). The engine only needs a small
//! store surface for session state; the in-memory implementation lives in
//! the runtime module, and external deployments can substitute their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::SessionId;
use crate::core::state::SessionState;

// ============================================================================
// SECTION: Session State Store
// ============================================================================

/// Session store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store reported an error.
    #[error("session store error: {0}")]
    Backend(String),
}

/// Backend-agnostic session state storage.
///
/// Implementations must be deterministic: a `load` after a `save` returns
/// the saved value until the next `save` or `remove` for that session.
pub trait SessionStateStore {
    /// Loads session state by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError>;

    /// Saves session state, replacing any prior state for the session.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, state: &SessionState) -> Result<(), StoreError>;

    /// Removes session state, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when removal fails.
    fn remove(&self, session_id: &SessionId) -> Result<(), StoreError>;
}
