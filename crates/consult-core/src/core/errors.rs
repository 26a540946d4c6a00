// crates/consult-core/src/core/errors.rs
// ============================================================================
// Module: Engine Error Taxonomy
// Description: Structured errors for graph loading and session operations.
// Purpose: Provide stable, programmatically matchable failure variants.
// Dependencies: crate::core::{identifiers, report}, crate::interfaces, serde, thiserror
// ============================================================================

//! ## Overview
//! Every engine failure is deterministic given its inputs; nothing in the
//! pure-computation core is transient or retryable. Graph-level failures
//! carry the complete defect list in one value, never a partial view, so the
//! rule-authoring surface can render everything at once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::RuleAction;
use crate::core::identifiers::SessionId;
use crate::core::report::ValidationReport;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Load Errors
// ============================================================================

/// One action that appears on more than one rule.
///
/// # Invariants
/// - `count` is always >= 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateAction {
    /// The action shared by multiple rules.
    pub action: RuleAction,
    /// How many rules carry the action.
    pub count: usize,
}

/// Formats duplicate actions for error display.
fn format_duplicates(duplicates: &[DuplicateAction]) -> String {
    duplicates
        .iter()
        .map(|duplicate| format!("{} ({}x)", duplicate.action, duplicate.count))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors raised while loading rule records into a graph.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GraphLoadError {
    /// Two or more rules share an action. Carries every duplicate.
    #[error("duplicate rule actions: {}", format_duplicates(.duplicates))]
    DuplicateActions {
        /// Every action that appears more than once, with its count.
        duplicates: Vec<DuplicateAction>,
    },
}

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Errors raised by session operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `GraphInvalid` always carries the full validation report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The rule graph failed validation; sessions must not start against it.
    #[error("rule graph failed validation: {report}")]
    GraphInvalid {
        /// Complete issue list from the validator.
        report: ValidationReport,
    },

    /// No session exists under the given identifier.
    #[error("session not found: {session_id}")]
    SessionNotFound {
        /// The identifier that matched no session.
        session_id: SessionId,
    },

    /// An answer arrived while no question was pending.
    #[error("no question is pending for session {session_id}")]
    NoActiveQuestion {
        /// The session without a pending question.
        session_id: SessionId,
    },

    /// A back request exceeded the recorded answer history.
    #[error("cannot revert {steps} answers; history holds {depth}")]
    BackOutOfRange {
        /// Requested number of answers to revert.
        steps: usize,
        /// Number of answers actually recorded.
        depth: usize,
    },

    /// The session store failed to load or persist state.
    #[error("session store failure: {0}")]
    Store(#[from] StoreError),
}
