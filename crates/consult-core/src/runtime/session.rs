// crates/consult-core/src/runtime/session.rs
// ============================================================================
// Module: Session Manager
// Description: Session lifecycle: start, answer, rollback, and snapshots.
// Purpose: Own per-session history and derive all state from it on demand.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{evaluator, validator}
// ============================================================================

//! ## Overview
//! The session manager mutates nothing but the answer history. After every
//! mutation it rebuilds the fact store, rule statuses, next question, and
//! diagnosis from the (possibly truncated) history from scratch: a stale
//! partial cache could retain `Fired` or `Blocked` conclusions that are no
//! longer justified once a fact is un-set.
//!
//! Each session is single-writer: operations on one session serialize behind
//! a per-session lock, while different sessions proceed in parallel against
//! the shared read-only graph.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use consult_logic::TriState;

use crate::core::errors::EngineError;
use crate::core::facts::AnswerEvent;
use crate::core::facts::FactStore;
use crate::core::identifiers::FactName;
use crate::core::identifiers::SessionId;
use crate::core::report::ConsultationSnapshot;
use crate::core::report::ValidationReport;
use crate::core::rule::RuleGraph;
use crate::core::state::SessionState;
use crate::interfaces::SessionStateStore;
use crate::interfaces::StoreError;
use crate::runtime::evaluator::Evaluation;
use crate::runtime::validator;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Mutex-backed session store for single-process deployments.
///
/// # Invariants
/// - Map access is serialized behind one lock; per-session write ordering is
///   the session manager's concern.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    /// Session states keyed by identifier.
    sessions: Mutex<BTreeMap<SessionId, SessionState>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Maps a poisoned lock to a store error.
///
/// Engine code never panics while holding the lock (panics are denied
/// workspace-wide), so this is defense at the seam, not an expected path.
fn poisoned() -> StoreError {
    StoreError::Backend("session lock poisoned".to_string())
}

impl SessionStateStore for InMemorySessionStore {
    fn load(&self, session_id: &SessionId) -> Result<Option<SessionState>, StoreError> {
        let sessions = self.sessions.lock().map_err(|_| poisoned())?;
        Ok(sessions.get(session_id).cloned())
    }

    fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().map_err(|_| poisoned())?;
        sessions.insert(state.session_id.clone(), state.clone());
        Ok(())
    }

    fn remove(&self, session_id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.sessions.lock().map_err(|_| poisoned())?;
        sessions.remove(session_id);
        Ok(())
    }
}

// ============================================================================
// SECTION: Session Manager
// ============================================================================

/// Owns one fact history per session and exposes the engine operations.
///
/// # Invariants
/// - The graph is pinned for the manager's lifetime; rule edits produce a
///   new validated graph served by a new manager.
/// - Derived state is recomputed from history on every operation.
#[derive(Debug)]
pub struct SessionManager<S: SessionStateStore> {
    /// The shared, read-only rule graph.
    graph: Arc<RuleGraph>,
    /// Session state persistence.
    store: S,
    /// Per-session write locks.
    locks: Mutex<BTreeMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionManager<InMemorySessionStore> {
    /// Creates a manager backed by the in-memory store.
    #[must_use]
    pub fn in_memory(graph: Arc<RuleGraph>) -> Self {
        Self::new(graph, InMemorySessionStore::new())
    }
}

impl<S: SessionStateStore> SessionManager<S> {
    /// Creates a manager over a graph and a session store.
    pub const fn new(graph: Arc<RuleGraph>, store: S) -> Self {
        Self {
            graph,
            store,
            locks: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the graph this manager serves.
    #[must_use]
    pub fn graph(&self) -> &RuleGraph {
        &self.graph
    }

    /// Runs the structural validator over the served graph.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        validator::check(&self.graph)
    }

    /// Starts (or restarts) a session, applying pre-screening facts first.
    ///
    /// `initial_facts` is the hand-off from the external questionnaire:
    /// boolean findings applied as the first history events before the first
    /// question is selected.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GraphInvalid`] with the full issue list when
    /// the graph has any error-severity defect, and [`EngineError::Store`]
    /// on persistence failures.
    pub fn start(
        &self,
        session_id: SessionId,
        initial_facts: &[(FactName, bool)],
    ) -> Result<ConsultationSnapshot, EngineError> {
        let report = self.validate();
        if !report.is_serviceable() {
            return Err(EngineError::GraphInvalid {
                report,
            });
        }

        let lock = self.session_lock(&session_id)?;
        let _held = lock.lock().map_err(|_| poisoned())?;

        let mut state = SessionState::new(session_id);
        for (fact, finding) in initial_facts {
            state.record(AnswerEvent::new(fact.clone(), TriState::from(*finding)));
        }
        self.store.save(&state)?;
        Ok(self.snapshot(&state))
    }

    /// Records an answer to the currently pending question.
    ///
    /// The pending question is itself derived from history, so the answer is
    /// attributed deterministically even across process restarts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] for unknown sessions,
    /// [`EngineError::NoActiveQuestion`] when questioning is already
    /// exhausted, and [`EngineError::Store`] on persistence failures.
    pub fn answer(
        &self,
        session_id: &SessionId,
        value: TriState,
    ) -> Result<ConsultationSnapshot, EngineError> {
        let lock = self.session_lock(session_id)?;
        let _held = lock.lock().map_err(|_| poisoned())?;

        let mut state = self.load_state(session_id)?;
        let facts = FactStore::from_history(&state.history);
        let mut evaluation = Evaluation::new(&self.graph, &facts);
        let Some(selection) = evaluation.select_next_question() else {
            return Err(EngineError::NoActiveQuestion {
                session_id: session_id.clone(),
            });
        };

        state.record(AnswerEvent::new(selection.fact, value));
        self.store.save(&state)?;
        Ok(self.snapshot(&state))
    }

    /// Reverts the last `steps` answers and recomputes everything.
    ///
    /// Truncation is the only mutation; every derived conclusion is rebuilt
    /// from the shortened history.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] for unknown sessions,
    /// [`EngineError::BackOutOfRange`] when `steps` exceeds the recorded
    /// history, and [`EngineError::Store`] on persistence failures.
    pub fn back(
        &self,
        session_id: &SessionId,
        steps: usize,
    ) -> Result<ConsultationSnapshot, EngineError> {
        let lock = self.session_lock(session_id)?;
        let _held = lock.lock().map_err(|_| poisoned())?;

        let mut state = self.load_state(session_id)?;
        if steps > state.depth() {
            return Err(EngineError::BackOutOfRange {
                steps,
                depth: state.depth(),
            });
        }
        state.truncate(steps);
        self.store.save(&state)?;
        Ok(self.snapshot(&state))
    }

    /// Returns the current snapshot without mutating anything.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] for unknown sessions and
    /// [`EngineError::Store`] on load failures.
    pub fn current_state(&self, session_id: &SessionId) -> Result<ConsultationSnapshot, EngineError> {
        let state = self.load_state(session_id)?;
        Ok(self.snapshot(&state))
    }

    /// Clears a session's history, returning it to the first question.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionNotFound`] for unknown sessions and
    /// [`EngineError::Store`] on persistence failures.
    pub fn restart(&self, session_id: &SessionId) -> Result<ConsultationSnapshot, EngineError> {
        let lock = self.session_lock(session_id)?;
        let _held = lock.lock().map_err(|_| poisoned())?;

        let mut state = self.load_state(session_id)?;
        state.truncate(state.depth());
        self.store.save(&state)?;
        Ok(self.snapshot(&state))
    }

    /// Loads session state or reports the session as missing.
    fn load_state(&self, session_id: &SessionId) -> Result<SessionState, EngineError> {
        self.store
            .load(session_id)?
            .ok_or_else(|| EngineError::SessionNotFound {
                session_id: session_id.clone(),
            })
    }

    /// Returns the write lock guarding one session.
    fn session_lock(&self, session_id: &SessionId) -> Result<Arc<Mutex<()>>, EngineError> {
        let mut locks = self.locks.lock().map_err(|_| poisoned())?;
        Ok(Arc::clone(locks.entry(session_id.clone()).or_default()))
    }

    /// Derives the full snapshot from a session's current history.
    fn snapshot(&self, state: &SessionState) -> ConsultationSnapshot {
        let facts = FactStore::from_history(&state.history);
        let mut evaluation = Evaluation::new(&self.graph, &facts);
        let selection = evaluation.select_next_question();
        let rule_reports = evaluation.build_rule_reports(selection.as_ref());
        let diagnosis = if selection.is_none() {
            Some(evaluation.build_diagnosis())
        } else {
            None
        };

        ConsultationSnapshot {
            session_id: state.session_id.clone(),
            next_question: selection.map(|current| current.fact),
            diagnosis,
            rule_reports,
            answered: state.history.clone(),
        }
    }
}
