// crates/consult-core/src/runtime/validator.rs
// ============================================================================
// Module: Graph Validator
// Description: Structural soundness checks over a rule graph.
// Purpose: Detect dangling references, cycles, unreachable goals, and orphans
//          before a graph is offered to any session.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Validation walks the rule graph independently of any session and returns
//! the complete issue list in one pass, never fail-fast, so the authoring
//! surface can show every defect at once. Dangling references and cycles are
//! errors that block session start; unreachable goals and orphan rules are
//! warnings for the authoring surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::identifiers::RuleAction;
use crate::core::report::ValidationIssue;
use crate::core::report::ValidationReport;
use crate::core::rule::Condition;
use crate::core::rule::RuleGraph;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Checks a rule graph for structural defects.
///
/// Runs every check regardless of earlier findings; issue order is
/// deterministic (dangling references, then cycles, then unreachable goals,
/// then orphan rules, each in rule display order).
#[must_use]
pub fn check(graph: &RuleGraph) -> ValidationReport {
    let mut issues = Vec::new();
    check_dangling(graph, &mut issues);
    check_cycles(graph, &mut issues);
    check_unreachable_goals(graph, &mut issues);
    check_orphans(graph, &mut issues);
    ValidationReport {
        issues,
    }
}

// ============================================================================
// SECTION: Dangling References
// ============================================================================

/// Reports derived conditions whose target action no rule produces.
///
/// Freshly loaded graphs cannot contain these (resolution is textual), but
/// graphs deserialized from external storage can.
fn check_dangling(graph: &RuleGraph, issues: &mut Vec<ValidationIssue>) {
    for rule in graph.rules() {
        for condition in &rule.conditions {
            if let Condition::DerivedRef(action) = condition
                && !graph.produces(action)
            {
                issues.push(ValidationIssue::DanglingReference {
                    rule: rule.action.clone(),
                    condition: action.as_str().to_string(),
                });
            }
        }
    }
}

// ============================================================================
// SECTION: Cycle Detection
// ============================================================================

/// Reports cycles in the action-reference graph.
///
/// Depth-first search with an explicit recursion stack; a derived reference
/// back to a rule still on the stack closes a cycle. Finished rules are
/// never revisited, so each cycle surfaces exactly once per back edge.
fn check_cycles(graph: &RuleGraph, issues: &mut Vec<ValidationIssue>) {
    let mut done = BTreeSet::new();
    for rule in graph.rules() {
        if done.contains(&rule.action) {
            continue;
        }
        let mut stack = Vec::new();
        visit_for_cycles(graph, &rule.action, &mut stack, &mut done, issues);
    }
}

/// One DFS visit for cycle detection.
fn visit_for_cycles(
    graph: &RuleGraph,
    action: &RuleAction,
    stack: &mut Vec<RuleAction>,
    done: &mut BTreeSet<RuleAction>,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(rule) = graph.rule(action) else {
        return;
    };
    stack.push(action.clone());
    for condition in &rule.conditions {
        if let Condition::DerivedRef(target) = condition {
            if done.contains(target) {
                continue;
            }
            if let Some(start) = stack.iter().position(|entry| entry == target) {
                let mut actions: Vec<_> = stack[start..].to_vec();
                actions.push(target.clone());
                issues.push(ValidationIssue::Cycle {
                    actions,
                });
                continue;
            }
            visit_for_cycles(graph, target, stack, done, issues);
        }
    }
    stack.pop();
    done.insert(action.clone());
}

// ============================================================================
// SECTION: Unreachable Goals
// ============================================================================

/// Reports goal rules from which no leaf condition is reachable.
///
/// A goal whose entire derived closure holds no leaf (cycle-only or empty
/// chains) can never be decided by questioning; that is an authoring smell,
/// not a fatal defect.
fn check_unreachable_goals(graph: &RuleGraph, issues: &mut Vec<ValidationIssue>) {
    for rule in graph.rules() {
        if !rule.is_goal {
            continue;
        }
        let mut seen = BTreeSet::new();
        let mut frontier = vec![rule.action.clone()];
        let mut leaf_found = false;
        while let Some(action) = frontier.pop() {
            if !seen.insert(action.clone()) {
                continue;
            }
            let Some(current) = graph.rule(&action) else {
                continue;
            };
            for condition in &current.conditions {
                match condition {
                    Condition::Leaf(_) => leaf_found = true,
                    Condition::DerivedRef(target) => frontier.push(target.clone()),
                }
            }
            if leaf_found {
                break;
            }
        }
        if !leaf_found {
            issues.push(ValidationIssue::UnreachableGoal {
                rule: rule.action.clone(),
            });
        }
    }
}

// ============================================================================
// SECTION: Orphan Rules
// ============================================================================

/// Reports non-goal rules whose action no other rule references.
///
/// An orphan's conclusion can never influence any goal, so the rule is dead
/// weight in the knowledge base.
fn check_orphans(graph: &RuleGraph, issues: &mut Vec<ValidationIssue>) {
    for rule in graph.rules() {
        if rule.is_goal {
            continue;
        }
        let referenced = graph.rules().iter().any(|other| {
            other.action != rule.action
                && other
                    .conditions
                    .iter()
                    .any(|condition| match condition {
                        Condition::DerivedRef(target) => *target == rule.action,
                        Condition::Leaf(_) => false,
                    })
        });
        if !referenced {
            issues.push(ValidationIssue::OrphanRule {
                rule: rule.action.clone(),
            });
        }
    }
}
