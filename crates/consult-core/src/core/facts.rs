// crates/consult-core/src/core/facts.rs
// ============================================================================
// Module: Fact Store
// Description: Tri-state fact assignments derived from an answer history.
// Purpose: Capture per-session findings as a pure function of ordered events.
// Dependencies: crate::core::identifiers, consult-logic, serde
// ============================================================================

//! ## Overview
//! A session's facts are never stored directly: they are always rebuilt from
//! the append-only answer history, so truncating the history ("back") can
//! never leave a stale assignment behind. Re-answering a fact overwrites its
//! value while the history keeps both events.
//!
//! An explicit `unknown` reply is itself an answer: the fact still evaluates
//! as `Unknown`, but the engine will not ask it again.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use consult_logic::TriState;

use crate::core::identifiers::FactName;

// ============================================================================
// SECTION: Answer Events
// ============================================================================

/// One recorded answer: the fact asked and the reply given.
///
/// # Invariants
/// - Events are append-only; "back" truncates the history tail, it never
///   edits events in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    /// The fact the question asked about.
    pub fact: FactName,
    /// The reply, including explicit `Unknown`.
    pub value: TriState,
}

impl AnswerEvent {
    /// Creates a new answer event.
    #[must_use]
    pub const fn new(fact: FactName, value: TriState) -> Self {
        Self {
            fact,
            value,
        }
    }
}

// ============================================================================
// SECTION: Fact Store
// ============================================================================

/// Tri-state assignment of fact names for one session.
///
/// # Invariants
/// - Derived deterministically from history; never a source of truth.
/// - A fact present with `Unknown` was explicitly answered as unknown and is
///   no longer askable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactStore {
    /// Latest value per fact; later history events overwrite earlier ones.
    values: BTreeMap<FactName, TriState>,
}

impl FactStore {
    /// Rebuilds the store by replaying an ordered answer history.
    #[must_use]
    pub fn from_history(history: &[AnswerEvent]) -> Self {
        let mut store = Self::default();
        for event in history {
            store.values.insert(event.fact.clone(), event.value);
        }
        store
    }

    /// Returns the effective value of a fact (`Unknown` when unanswered).
    #[must_use]
    pub fn value(&self, fact: &FactName) -> TriState {
        self.values.get(fact).copied().unwrap_or(TriState::Unknown)
    }

    /// Returns true when the fact has been answered, even with `Unknown`.
    #[must_use]
    pub fn is_answered(&self, fact: &FactName) -> bool {
        self.values.contains_key(fact)
    }

    /// Returns true when the fact is still worth asking.
    ///
    /// A fact is askable while it has no recorded answer at all; operator
    /// short-circuit pruning on top of this is the evaluator's concern.
    #[must_use]
    pub fn is_askable(&self, fact: &FactName) -> bool {
        !self.is_answered(fact)
    }

    /// Returns facts the user explicitly answered as unknown, in name order.
    #[must_use]
    pub fn unresolved_facts(&self) -> Vec<FactName> {
        self.values
            .iter()
            .filter(|(_, value)| value.is_unknown())
            .map(|(fact, _)| fact.clone())
            .collect()
    }

    /// Returns the number of answered facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no fact has been answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
