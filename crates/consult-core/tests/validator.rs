// crates/consult-core/tests/validator.rs
// ============================================================================
// Module: Validator Tests
// Description: Structural checks for dangling references, cycles, and orphans.
// ============================================================================
//! ## Overview
//! Validates the single-pass issue list: severities, deterministic ordering,
//! and the serviceability gate used before sessions start.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod support;

use consult_core::IssueSeverity;
use consult_core::Operator;
use consult_core::RuleGraph;
use consult_core::ValidationIssue;
use consult_core::runtime::validator;
use support::TestResult;
use support::ensure;
use support::graphs::action;
use support::graphs::cyclic_graph;
use support::graphs::dangling_graph;
use support::graphs::goal;
use support::graphs::orphan_graph;
use support::graphs::two_goal_graph;

// ============================================================================
// SECTION: Clean Graphs
// ============================================================================

#[test]
fn test_clean_graph_reports_no_issues() -> TestResult {
    let report = validator::check(&two_goal_graph()?);
    ensure(report.is_clean(), format!("Expected no issues, got: {report}"))?;
    ensure(report.is_serviceable(), "Expected a clean graph to be serviceable")
}

// ============================================================================
// SECTION: Dangling References
// ============================================================================

#[test]
fn test_dangling_reference_is_an_error() -> TestResult {
    let report = validator::check(&dangling_graph()?);
    let dangling: Vec<&ValidationIssue> = report
        .issues
        .iter()
        .filter(|issue| matches!(issue, ValidationIssue::DanglingReference { .. }))
        .collect();
    ensure(dangling.len() == 1, "Expected exactly one dangling-reference issue")?;
    ensure(
        matches!(
            dangling[0],
            ValidationIssue::DanglingReference { rule, condition }
                if *rule == action("work_visa_applicable")
                    && condition == "sponsorship_confirmed"
        ),
        "Expected the issue to name the rule and the unresolvable condition",
    )?;
    ensure(
        dangling[0].severity() == IssueSeverity::Error,
        "Expected dangling references to be errors",
    )?;
    ensure(!report.is_serviceable(), "Expected a dangling graph to be unserviceable")
}

// ============================================================================
// SECTION: Cycles
// ============================================================================

#[test]
fn test_cycle_surfaces_exactly_once() -> TestResult {
    let report = validator::check(&cyclic_graph()?);
    let cycles: Vec<&ValidationIssue> = report
        .issues
        .iter()
        .filter(|issue| matches!(issue, ValidationIssue::Cycle { .. }))
        .collect();
    ensure(cycles.len() == 1, "Expected the two-rule cycle to surface exactly once")?;
    let ValidationIssue::Cycle {
        actions,
    } = cycles[0]
    else {
        return ensure(false, "Expected a cycle issue");
    };
    ensure(
        *actions
            == vec![
                action("funds_verified"),
                action("investment_active"),
                action("funds_verified"),
            ],
        format!("Expected the chain to close on its first entry, got {actions:?}"),
    )?;
    ensure(!report.is_serviceable(), "Expected a cyclic graph to be unserviceable")
}

#[test]
fn test_cycle_only_goal_is_also_unreachable() -> TestResult {
    let report = validator::check(&cyclic_graph()?);
    ensure(
        report.issues.iter().any(|issue| {
            matches!(
                issue,
                ValidationIssue::UnreachableGoal { rule }
                    if *rule == action("investor_visa_applicable")
            )
        }),
        "Expected the goal above the cycle to have no reachable leaf",
    )?;
    // Deterministic ordering: cycles before unreachable goals.
    ensure(
        matches!(report.issues[0], ValidationIssue::Cycle { .. }),
        "Expected the cycle issue first",
    )?;
    ensure(
        matches!(report.issues[1], ValidationIssue::UnreachableGoal { .. }),
        "Expected the unreachable-goal issue second",
    )
}

// ============================================================================
// SECTION: Warnings
// ============================================================================

#[test]
fn test_goal_without_conditions_is_unreachable() -> TestResult {
    let graph = RuleGraph::load(vec![goal(
        "blanket_waiver_applicable",
        Operator::And,
        "waiver",
        &[],
    )])?;
    let report = validator::check(&graph);
    ensure(
        matches!(
            report.issues.as_slice(),
            [ValidationIssue::UnreachableGoal { rule }]
                if *rule == action("blanket_waiver_applicable")
        ),
        "Expected a lone unreachable-goal warning",
    )?;
    ensure(report.is_serviceable(), "Expected warnings not to block sessions")
}

#[test]
fn test_unreferenced_rule_is_an_orphan_warning() -> TestResult {
    let report = validator::check(&orphan_graph()?);
    ensure(
        matches!(
            report.issues.as_slice(),
            [ValidationIssue::OrphanRule { rule }]
                if *rule == action("financial_support_verified")
        ),
        format!("Expected a lone orphan warning, got: {report}"),
    )?;
    ensure(
        report.issues[0].severity() == IssueSeverity::Warning,
        "Expected orphans to be warnings",
    )?;
    ensure(report.is_serviceable(), "Expected an orphan not to block sessions")?;
    ensure(!report.is_clean(), "Expected the report to still flag the orphan")
}
