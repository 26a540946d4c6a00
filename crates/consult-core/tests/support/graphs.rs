// crates/consult-core/tests/support/graphs.rs
// ============================================================================
// Module: Graph Fixtures
// Description: Visa-eligibility knowledge bases shared by the engine tests.
// ============================================================================
//! ## Overview
//! Small rule sets modeled on a visa eligibility consultation. Each fixture
//! exercises one structural shape: shared leaves across goals, derived
//! chains, short-circuit skipping, cycles, and orphans.

use consult_core::AnswerEvent;
use consult_core::FactName;
use consult_core::Operator;
use consult_core::RuleAction;
use consult_core::RuleGraph;
use consult_core::RuleRecord;
use consult_core::TriState;

use super::TestResult;

// ========================================================================
// Record Helpers
// ========================================================================

/// Builds a non-goal rule record.
pub fn rule(action: &str, operator: Operator, category: &str, conditions: &[&str]) -> RuleRecord {
    RuleRecord::new(
        action,
        conditions.iter().map(ToString::to_string).collect(),
        operator,
        category,
    )
}

/// Builds a goal rule record.
pub fn goal(action: &str, operator: Operator, category: &str, conditions: &[&str]) -> RuleRecord {
    rule(action, operator, category, conditions).goal()
}

/// Shorthand for a fact name.
pub fn fact(name: &str) -> FactName {
    FactName::new(name)
}

/// Shorthand for a rule action.
pub fn action(name: &str) -> RuleAction {
    RuleAction::new(name)
}

/// Builds an answer history from (fact, value) pairs.
pub fn answers(entries: &[(&str, TriState)]) -> Vec<AnswerEvent> {
    entries
        .iter()
        .map(|(name, value)| AnswerEvent::new(fact(name), *value))
        .collect()
}

// ========================================================================
// Fixtures
// ========================================================================

/// Two goals in distinct categories sharing one leaf fact.
///
/// The treaty-trader goal is an AND over (nationality, trade volume); the
/// temporary-visitor goal is an OR over (nationality, short stay). Asking
/// order starts with the shared nationality fact.
pub fn two_goal_graph() -> TestResult<RuleGraph> {
    let records = vec![
        goal(
            "treaty_trader_visa_applicable",
            Operator::And,
            "treaty_trader",
            &["nationality_matches_treaty_country", "trade_is_substantial"],
        ),
        goal(
            "temporary_visitor_visa_applicable",
            Operator::Or,
            "temporary_visitor",
            &["nationality_matches_treaty_country", "stay_under_ninety_days"],
        ),
    ];
    Ok(RuleGraph::load(records)?)
}

/// One goal whose second condition is a derived two-leaf rule.
pub fn layered_graph() -> TestResult<RuleGraph> {
    let records = vec![
        goal(
            "work_visa_applicable",
            Operator::And,
            "work",
            &["degree_relevant_to_duties", "sponsorship_confirmed"],
        ),
        rule(
            "sponsorship_confirmed",
            Operator::And,
            "work",
            &["petition_filed", "labor_certification_granted"],
        ),
    ];
    Ok(RuleGraph::load(records)?)
}

/// An OR goal whose second branch is derived; firing the first leaf leaves
/// the derived rule untouched.
pub fn short_circuit_graph() -> TestResult<RuleGraph> {
    let records = vec![
        goal(
            "renewal_visa_applicable",
            Operator::Or,
            "renewal",
            &["previously_held_status", "clean_record_verified"],
        ),
        rule(
            "clean_record_verified",
            Operator::And,
            "renewal",
            &["no_overstay_on_record", "no_criminal_record"],
        ),
    ];
    Ok(RuleGraph::load(records)?)
}

/// A two-rule cycle below a goal with no reachable leaf.
pub fn cyclic_graph() -> TestResult<RuleGraph> {
    let records = vec![
        goal(
            "investor_visa_applicable",
            Operator::And,
            "investor",
            &["funds_verified"],
        ),
        rule("funds_verified", Operator::And, "investor", &["investment_active"]),
        rule("investment_active", Operator::And, "investor", &["funds_verified"]),
    ];
    Ok(RuleGraph::load(records)?)
}

/// A clean goal plus a non-goal rule nothing references.
pub fn orphan_graph() -> TestResult<RuleGraph> {
    let records = vec![
        goal(
            "student_visa_applicable",
            Operator::And,
            "student",
            &["enrolled_at_certified_school"],
        ),
        rule(
            "financial_support_verified",
            Operator::And,
            "student",
            &["bank_balance_sufficient"],
        ),
    ];
    Ok(RuleGraph::load(records)?)
}

/// A graph with a derived reference no rule produces.
///
/// Loading resolves conditions textually, so a dangling reference can only
/// enter through deserialized storage; the fixture goes through JSON.
pub fn dangling_graph() -> TestResult<RuleGraph> {
    let encoded = r#"{
        "rules": [
            {
                "action": "work_visa_applicable",
                "conditions": [
                    {"leaf": "degree_relevant_to_duties"},
                    {"derived_ref": "sponsorship_confirmed"}
                ],
                "operator": "and",
                "category": "work",
                "is_goal": true,
                "position": 0
            }
        ]
    }"#;
    Ok(serde_json::from_str(encoded)?)
}

/// Scrambled declaration order across two categories with a derived chain.
///
/// Category first-appearance order is student, then treaty trader; the
/// treaty chain has depths 1 and 0 below its goal.
pub fn unorganized_graph() -> TestResult<RuleGraph> {
    let records = vec![
        rule(
            "financial_support_verified",
            Operator::And,
            "student",
            &["bank_balance_sufficient"],
        ),
        goal(
            "treaty_trader_visa_applicable",
            Operator::And,
            "treaty_trader",
            &["trade_is_substantial", "nationality_matches_treaty_country"],
        ),
        rule(
            "trade_is_substantial",
            Operator::And,
            "treaty_trader",
            &["trade_volume_documented"],
        ),
        rule(
            "trade_volume_documented",
            Operator::And,
            "treaty_trader",
            &["import_export_records_available"],
        ),
        goal(
            "student_visa_applicable",
            Operator::And,
            "student",
            &["enrolled_at_certified_school", "financial_support_verified"],
        ),
    ];
    Ok(RuleGraph::load(records)?)
}
