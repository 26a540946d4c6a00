// crates/consult-core/src/core/mod.rs
// ============================================================================
// Module: Consult Core Types
// Description: Data model for rules, facts, sessions, and reports.
// Purpose: Wire together the core modules and their re-exports.
// Dependencies: crate::core::{errors, facts, identifiers, report, rule, state}
// ============================================================================

//! ## Overview
//! The core modules define the engine's data model: identifiers, the rule
//! graph, per-session facts and state, report types, and the error taxonomy.
//! Evaluation and lifecycle logic live in the runtime module.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod errors;
pub mod facts;
pub mod identifiers;
pub mod report;
pub mod rule;
pub mod state;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use errors::DuplicateAction;
pub use errors::EngineError;
pub use errors::GraphLoadError;
pub use facts::AnswerEvent;
pub use facts::FactStore;
pub use identifiers::Category;
pub use identifiers::FactName;
pub use identifiers::RuleAction;
pub use identifiers::SessionId;
pub use report::ApplicableOutcome;
pub use report::ConditionReport;
pub use report::ConditionalOutcome;
pub use report::ConsultationSnapshot;
pub use report::DiagnosisResult;
pub use report::IssueSeverity;
pub use report::NeedTree;
pub use report::RuleReport;
pub use report::RuleStatus;
pub use report::ValidationIssue;
pub use report::ValidationReport;
pub use rule::Condition;
pub use rule::Rule;
pub use rule::RuleGraph;
pub use rule::RuleRecord;
pub use state::SessionState;
