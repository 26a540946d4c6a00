// crates/consult-core/src/runtime/organizer.rs
// ============================================================================
// Module: Rule Organizer
// Description: Canonical display ordering of rules from graph structure.
// Purpose: Reassign display positions without changing evaluation semantics.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Organizing computes a total display order over all rules and returns a
//! new graph value with reassigned positions; the live graph is never
//! mutated in place, and sessions keep the version they started with.
//! Categories always come first in first-appearance order; the mode decides
//! ordering within a category.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::RuleAction;
use crate::core::rule::Condition;
use crate::core::rule::Rule;
use crate::core::rule::RuleGraph;

// ============================================================================
// SECTION: Organize Mode
// ============================================================================

/// Strategy for ordering rules within a category.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizeMode {
    /// Goal rules first, then decreasing dependency depth.
    Dependency,
    /// Lexicographic by action.
    Action,
}

// ============================================================================
// SECTION: Organizing
// ============================================================================

/// Computes a canonical display ordering and returns the reordered graph.
///
/// Ties keep their prior relative order (stable sort), so repeated
/// organizing is idempotent. Only positions change; evaluation results are
/// identical before and after.
#[must_use]
pub fn auto_organize(graph: &RuleGraph, mode: OrganizeMode) -> RuleGraph {
    let mut rules: Vec<Rule> = graph.rules().to_vec();
    let mut depths = BTreeMap::new();

    match mode {
        OrganizeMode::Dependency => {
            rules.sort_by_key(|rule| {
                let depth = if rule.is_goal {
                    0
                } else {
                    dependency_depth(graph, &rule.action, &mut depths, &mut Vec::new())
                };
                (graph.category_rank(&rule.category), u8::from(!rule.is_goal), Reverse(depth))
            });
        }
        OrganizeMode::Action => {
            rules.sort_by(|left, right| {
                graph
                    .category_rank(&left.category)
                    .cmp(&graph.category_rank(&right.category))
                    .then_with(|| left.action.as_str().cmp(right.action.as_str()))
            });
        }
    }

    RuleGraph::with_order(rules)
}

/// Length of the longest derived-reference chain from a leaf up to a rule.
///
/// All-leaf rules have depth zero. Memoized single pass; a reference back
/// into the active chain contributes zero (cycles are validator errors and
/// must not hang the organizer).
fn dependency_depth(
    graph: &RuleGraph,
    action: &RuleAction,
    memo: &mut BTreeMap<RuleAction, usize>,
    stack: &mut Vec<RuleAction>,
) -> usize {
    if let Some(depth) = memo.get(action) {
        return *depth;
    }
    if stack.contains(action) {
        return 0;
    }
    let Some(rule) = graph.rule(action) else {
        return 0;
    };

    stack.push(action.clone());
    let mut depth = 0;
    for condition in &rule.conditions {
        if let Condition::DerivedRef(target) = condition
            && graph.produces(target)
        {
            depth = depth.max(1 + dependency_depth(graph, target, memo, stack));
        }
    }
    stack.pop();

    memo.insert(action.clone(), depth);
    depth
}
