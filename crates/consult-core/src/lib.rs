// crates/consult-core/src/lib.rs
// ============================================================================
// Module: Consult Core Root
// Description: Public API surface for the eligibility-diagnosis engine.
// Purpose: Wire together core, runtime, and interface modules with re-exports.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Backward-chaining eligibility engine. A validated, immutable rule graph
//! is shared across sessions; each session carries only its append-only
//! answer history, and every snapshot (rule statuses, next question,
//! diagnosis) is rederived from that history under three-valued logic.
//!
//! The engine is transport-agnostic: external surfaces consume it through
//! the four operations on [`SessionManager`] (`validate`, `start`, `answer`,
//! `back`), all of whose inputs and outputs serialize with serde.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use consult_logic::Operator;
pub use consult_logic::TriState;

pub use crate::core::AnswerEvent;
pub use crate::core::ApplicableOutcome;
pub use crate::core::Category;
pub use crate::core::Condition;
pub use crate::core::ConditionReport;
pub use crate::core::ConditionalOutcome;
pub use crate::core::ConsultationSnapshot;
pub use crate::core::DiagnosisResult;
pub use crate::core::DuplicateAction;
pub use crate::core::EngineError;
pub use crate::core::FactName;
pub use crate::core::FactStore;
pub use crate::core::GraphLoadError;
pub use crate::core::IssueSeverity;
pub use crate::core::NeedTree;
pub use crate::core::Rule;
pub use crate::core::RuleAction;
pub use crate::core::RuleGraph;
pub use crate::core::RuleRecord;
pub use crate::core::RuleReport;
pub use crate::core::RuleStatus;
pub use crate::core::SessionId;
pub use crate::core::SessionState;
pub use crate::core::ValidationIssue;
pub use crate::core::ValidationReport;
pub use crate::interfaces::SessionStateStore;
pub use crate::interfaces::StoreError;
pub use crate::runtime::Evaluation;
pub use crate::runtime::InMemorySessionStore;
pub use crate::runtime::OrganizeMode;
pub use crate::runtime::QuestionSelection;
pub use crate::runtime::SessionManager;
pub use crate::runtime::auto_organize;
