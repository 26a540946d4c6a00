// crates/consult-logic/src/lib.rs
// ============================================================================
// Module: Consult Logic Root
// Description: Public API surface for the tri-state logic subsystem.
// Purpose: Wire together tri-state values and operator combination.
// Dependencies: crate::{operator, tristate}
// ============================================================================

//! ## Overview
//! Domain-agnostic three-valued logic for eligibility consultations. The
//! crate defines tri-state truth values and declared-order operator
//! combination with deterministic short-circuit semantics, so that higher
//! layers can reuse the same scan order for truth derivation and for
//! deciding which open question is still worth asking.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod operator;
pub mod tristate;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use operator::Operator;
pub use tristate::TriState;

