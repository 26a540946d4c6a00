// crates/consult-core/src/runtime/mod.rs
// ============================================================================
// Module: Consult Runtime
// Description: Evaluation, session lifecycle, validation, and organizing.
// Purpose: Wire together the runtime modules and their re-exports.
// Dependencies: crate::runtime::{evaluator, organizer, session, validator}
// ============================================================================

//! ## Overview
//! The runtime consumes the core data model: the evaluator derives statuses
//! and questions, the session manager owns histories, the validator guards
//! structural soundness, and the organizer computes display order.

// ============================================================================
// SECTION: Runtime Modules
// ============================================================================

pub mod evaluator;
pub mod organizer;
pub mod session;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluator::Evaluation;
pub use evaluator::QuestionSelection;
pub use organizer::OrganizeMode;
pub use organizer::auto_organize;
pub use session::InMemorySessionStore;
pub use session::SessionManager;
pub use validator::check;
