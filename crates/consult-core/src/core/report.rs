// crates/consult-core/src/core/report.rs
// ============================================================================
// Module: Consultation Reports
// Description: Rule status snapshots, need trees, diagnoses, and validation reports.
// Purpose: Define the serializable outputs rendered by external surfaces.
// Dependencies: crate::core::{facts, identifiers}, consult-logic, serde
// ============================================================================

//! ## Overview
//! Everything a UI renders comes out of the engine as one of the snapshot
//! types in this module. All of them are computed, never stored: a snapshot
//! is a pure function of (rule graph, answer history) and two builds over
//! unchanged inputs are identical.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use consult_logic::Operator;
use consult_logic::TriState;

use crate::core::facts::AnswerEvent;
use crate::core::identifiers::Category;
use crate::core::identifiers::FactName;
use crate::core::identifiers::RuleAction;
use crate::core::identifiers::SessionId;

// ============================================================================
// SECTION: Rule Status
// ============================================================================

/// Evaluation state of one rule within a session.
///
/// # Invariants
/// - `Fired` and `Blocked` are terminal for the session absent a rollback.
/// - `Evaluating` is a presentation overlay for rules on the path to the
///   currently selected question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleStatus {
    /// Not yet reached from any goal under the current partial evaluation.
    Pending,
    /// On the active path being resolved to find the next question.
    Evaluating,
    /// The operator's truth condition is satisfied.
    Fired,
    /// The operator's truth condition is provably unsatisfiable.
    Blocked,
    /// Neither satisfied nor unsatisfiable; at least one condition unknown.
    Uncertain,
}

impl RuleStatus {
    /// Returns true for statuses that can never change on further answers.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Fired | Self::Blocked)
    }

    /// Derives the status implied by a rule's combined tri-value.
    #[must_use]
    pub const fn from_value(value: TriState) -> Self {
        match value {
            TriState::True => Self::Fired,
            TriState::False => Self::Blocked,
            TriState::Unknown => Self::Uncertain,
        }
    }
}

// ============================================================================
// SECTION: Rule Reports
// ============================================================================

/// Snapshot of one condition inside a rule report.
///
/// # Invariants
/// - `value` reflects the fact store and memoized rule values at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionReport {
    /// Textual identity of the condition.
    pub text: String,
    /// Resolved tri-state value at build time.
    pub value: TriState,
    /// Whether the condition references another rule's action.
    pub is_derived: bool,
}

/// Snapshot of one rule for presentation.
///
/// # Invariants
/// - Pure function of (graph, fact store, current question selection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleReport {
    /// The rule's conclusion and key.
    pub action: RuleAction,
    /// The rule's grouping tag.
    pub category: Category,
    /// Operator combining the conditions.
    pub operator: Operator,
    /// Whether the rule is a goal.
    pub is_goal: bool,
    /// Display position within the graph.
    pub position: usize,
    /// Evaluation status.
    pub status: RuleStatus,
    /// Per-condition snapshots in declared order.
    pub conditions: Vec<ConditionReport>,
}

// ============================================================================
// SECTION: Need Trees
// ============================================================================

/// Minimal tree of still-unknown conditions needed to fire a rule.
///
/// # Invariants
/// - Contains only conditions whose value was `Unknown` at build time;
///   operator-aware pruning drops satisfied and moot branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedTree {
    /// A raw fact that still needs an answer.
    Fact {
        /// The unanswered (or explicitly unknown) fact.
        name: FactName,
    },
    /// A derived requirement expanded into its own unknowns.
    Group {
        /// Action of the rule this group expands.
        action: RuleAction,
        /// `And`: every branch is needed. `Or`: any one branch suffices.
        operator: Operator,
        /// Remaining unknown branches in declared order.
        branches: Vec<NeedTree>,
    },
}

// ============================================================================
// SECTION: Diagnosis
// ============================================================================

/// A goal whose rule fired: the outcome is provably applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicableOutcome {
    /// The goal rule's action.
    pub action: RuleAction,
    /// The goal rule's category.
    pub category: Category,
}

/// A goal still undecided, with the unknowns that would decide it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalOutcome {
    /// The goal rule's action.
    pub action: RuleAction,
    /// The goal rule's category.
    pub category: Category,
    /// Remaining unknown conditions, operator-aware.
    pub needs: NeedTree,
}

/// Final classification of every goal once no askable question remains.
///
/// # Invariants
/// - Blocked goals are omitted entirely.
/// - Goal order follows question-selection order (category rank, position).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    /// Goals whose rules fired.
    pub applicable: Vec<ApplicableOutcome>,
    /// Goals still undecided, with their remaining unknowns.
    pub conditional: Vec<ConditionalOutcome>,
    /// Actions derived true during evaluation (fired rules).
    pub derived_facts: Vec<RuleAction>,
    /// Facts the user explicitly answered as unknown.
    pub unresolved_facts: Vec<FactName>,
}

// ============================================================================
// SECTION: Consultation Snapshot
// ============================================================================

/// Full engine output after any session operation.
///
/// # Invariants
/// - `diagnosis` is present exactly when `next_question` is `None`.
/// - Recomputed from scratch after every mutation; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationSnapshot {
    /// The session this snapshot belongs to.
    pub session_id: SessionId,
    /// The next fact worth asking, if any remains.
    pub next_question: Option<FactName>,
    /// Final goal classification, once questioning is exhausted.
    pub diagnosis: Option<DiagnosisResult>,
    /// Per-rule status snapshots in display order.
    pub rule_reports: Vec<RuleReport>,
    /// The answer history the snapshot was derived from.
    pub answered: Vec<AnswerEvent>,
}

// ============================================================================
// SECTION: Validation Reports
// ============================================================================

/// Severity of a structural issue.
///
/// # Invariants
/// - Only `Error` issues block session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// Fatal for serving sessions.
    Error,
    /// Advisory; surfaced to the authoring surface only.
    Warning,
}

/// One structural defect found in a rule graph.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    /// A derived condition points at an action no rule produces.
    DanglingReference {
        /// Rule holding the condition.
        rule: RuleAction,
        /// The unresolvable condition text.
        condition: String,
    },
    /// A rule transitively references its own action.
    Cycle {
        /// The action sequence forming the cycle, closing on its first entry.
        actions: Vec<RuleAction>,
    },
    /// A goal rule no leaf condition of which is reachable.
    UnreachableGoal {
        /// The unreachable goal rule.
        rule: RuleAction,
    },
    /// A non-goal rule whose action nothing references.
    OrphanRule {
        /// The unreferenced rule.
        rule: RuleAction,
    },
}

impl ValidationIssue {
    /// Returns the issue's severity.
    #[must_use]
    pub const fn severity(&self) -> IssueSeverity {
        match self {
            Self::DanglingReference { .. } | Self::Cycle { .. } => IssueSeverity::Error,
            Self::UnreachableGoal { .. } | Self::OrphanRule { .. } => IssueSeverity::Warning,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference {
                rule,
                condition,
            } => {
                write!(f, "rule '{rule}' references '{condition}' which no rule derives")
            }
            Self::Cycle {
                actions,
            } => {
                let chain = actions
                    .iter()
                    .map(RuleAction::as_str)
                    .collect::<Vec<_>>()
                    .join(" -> ");
                write!(f, "rules form a cycle: {chain}")
            }
            Self::UnreachableGoal {
                rule,
            } => {
                write!(f, "goal rule '{rule}' has no reachable leaf condition")
            }
            Self::OrphanRule {
                rule,
            } => {
                write!(f, "rule '{rule}' is neither a goal nor referenced by any rule")
            }
        }
    }
}

/// Complete, single-pass list of structural issues in a rule graph.
///
/// # Invariants
/// - Never fail-fast: every detectable issue appears, so the authoring
///   surface can show all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Every issue found, in deterministic order.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Returns true when the graph is sound enough to serve sessions.
    ///
    /// Warnings do not block; any error-severity issue does.
    #[must_use]
    pub fn is_serviceable(&self) -> bool {
        self.issues
            .iter()
            .all(|issue| issue.severity() != IssueSeverity::Error)
    }

    /// Returns true when no issue of any severity was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("no issues");
        }
        let rendered = self
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{} issue(s): {rendered}", self.issues.len())
    }
}
