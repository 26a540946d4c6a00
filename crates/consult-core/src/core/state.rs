// crates/consult-core/src/core/state.rs
// ============================================================================
// Module: Session State
// Description: Persistent per-session state: identifier plus answer history.
// Purpose: Capture deterministic session evolution for replay.
// Dependencies: crate::core::{facts, identifiers}, serde
// ============================================================================

//! ## Overview
//! Session state is deliberately minimal: the session identifier and the
//! append-only answer history. Everything else (fact store, rule statuses,
//! next question, diagnosis) is derived from the history on demand. This is
//! the single most important correctness property of the session layer:
//! derived state is always a pure function of current history, never of its
//! own prior value, so truncating the history can never leave a stale
//! `Fired` or `Blocked` conclusion behind.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::facts::AnswerEvent;
use crate::core::identifiers::SessionId;

// ============================================================================
// SECTION: Session State
// ============================================================================

/// Stored state of one consultation session.
///
/// # Invariants
/// - `history` is append-only; rollback truncates the tail.
/// - One session is single-writer; callers serialize access per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// The session identifier.
    pub session_id: SessionId,
    /// Ordered answer events since the session started.
    pub history: Vec<AnswerEvent>,
}

impl SessionState {
    /// Creates a fresh session with an empty history.
    #[must_use]
    pub const fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            history: Vec::new(),
        }
    }

    /// Appends one answer event to the history.
    pub fn record(&mut self, event: AnswerEvent) {
        self.history.push(event);
    }

    /// Drops the last `steps` events.
    ///
    /// Callers must bound `steps` by [`Self::depth`] first; excess values
    /// clear the whole history.
    pub fn truncate(&mut self, steps: usize) {
        let keep = self.history.len().saturating_sub(steps);
        self.history.truncate(keep);
    }

    /// Returns the number of recorded answers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.history.len()
    }
}
