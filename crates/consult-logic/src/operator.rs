// crates/consult-logic/src/operator.rs
// ============================================================================
// Module: Operator Combination
// Description: Declared-order AND/OR folding over tri-state operands.
// Purpose: Provide the single scan-order contract shared by truth derivation
//          and question selection.
// Dependencies: crate::tristate, serde
// ============================================================================

//! ## Overview
//! A rule combines its condition values with one operator, scanning operands
//! in declared order and short-circuiting deterministically. The identical
//! scan order decides which unanswered condition is still worth asking: under
//! AND nothing after an earlier `False` matters, under OR nothing after an
//! earlier `True` does. [`Operator::is_moot_after`] exposes that cut-off so
//! evaluation and askability can never disagree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::tristate::TriState;

// ============================================================================
// SECTION: Operator
// ============================================================================

/// Logical operator applied across a rule's conditions
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// All conditions must hold (conjunction)
    And,
    /// At least one condition must hold (disjunction)
    Or,
}

impl Operator {
    /// Returns the value that resolves the combination as soon as it appears
    ///
    /// `False` absorbs a conjunction; `True` absorbs a disjunction.
    #[must_use]
    pub const fn absorbing(self) -> TriState {
        match self {
            Self::And => TriState::False,
            Self::Or => TriState::True,
        }
    }

    /// Returns the value of the empty combination
    ///
    /// An empty AND is trivially satisfied; an empty OR is trivially
    /// unsatisfiable.
    #[must_use]
    pub const fn identity(self) -> TriState {
        match self {
            Self::And => TriState::True,
            Self::Or => TriState::False,
        }
    }

    /// Folds operand values in declared order with short-circuiting
    ///
    /// Scanning stops at the first absorbing value. Otherwise the result is
    /// `Unknown` when any operand was `Unknown`, and the identity value when
    /// every operand equaled it.
    #[must_use]
    pub fn combine<I>(self, values: I) -> TriState
    where
        I: IntoIterator<Item = TriState>,
    {
        let mut acc = self.identity();
        for value in values {
            if value == self.absorbing() {
                return value;
            }
            acc = match self {
                Self::And => acc.and(value),
                Self::Or => acc.or(value),
            };
        }
        acc
    }

    /// Returns true when operands after `value` no longer matter
    ///
    /// Used by question selection: a leaf following an absorbing sibling is
    /// never worth asking, because its answer cannot change the combination.
    #[must_use]
    pub fn is_moot_after(self, value: TriState) -> bool {
        value == self.absorbing()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::And => "AND",
            Self::Or => "OR",
        };
        f.write_str(label)
    }
}
