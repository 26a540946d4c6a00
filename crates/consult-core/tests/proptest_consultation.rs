// crates/consult-core/tests/proptest_consultation.rs
// ============================================================================
// Module: Consultation Property-Based Tests
// Description: Property tests for replay determinism and termination.
// Purpose: Detect panics and invariants across wide input ranges.
// ============================================================================

//! Property-based tests for session replay and evaluator invariants.

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

use std::collections::BTreeMap;
use std::sync::Arc;

use consult_core::ConsultationSnapshot;
use consult_core::EngineError;
use consult_core::InMemorySessionStore;
use consult_core::Operator;
use consult_core::RuleGraph;
use consult_core::RuleRecord;
use consult_core::RuleStatus;
use consult_core::SessionId;
use consult_core::SessionManager;
use consult_core::TriState;
use proptest::prelude::*;

/// The fixed two-goal consultation used for replay properties.
fn consultation_graph() -> RuleGraph {
    let records = vec![
        RuleRecord::new(
            "treaty_trader_visa_applicable",
            vec![
                "nationality_matches_treaty_country".to_string(),
                "trade_is_substantial".to_string(),
            ],
            Operator::And,
            "treaty_trader",
        )
        .goal(),
        RuleRecord::new(
            "temporary_visitor_visa_applicable",
            vec![
                "nationality_matches_treaty_country".to_string(),
                "stay_under_ninety_days".to_string(),
            ],
            Operator::Or,
            "temporary_visitor",
        )
        .goal(),
    ];
    RuleGraph::load(records).expect("fixture actions are distinct")
}

/// Feeds replies in order until they run out or questioning is exhausted.
fn drive(
    manager: &SessionManager<InMemorySessionStore>,
    session_id: &SessionId,
    replies: &[TriState],
) -> ConsultationSnapshot {
    for reply in replies {
        match manager.answer(session_id, *reply) {
            Ok(_) => {}
            Err(EngineError::NoActiveQuestion { .. }) => break,
            Err(error) => panic!("unexpected engine error: {error}"),
        }
    }
    manager
        .current_state(session_id)
        .expect("session exists after driving")
}

fn tri_state_strategy() -> impl Strategy<Value = TriState> {
    prop_oneof![
        Just(TriState::True),
        Just(TriState::False),
        Just(TriState::Unknown),
    ]
}

/// Small random rule graphs over a shared name pool.
///
/// Conditions may hit the pool's rule actions, so derived chains, cycles,
/// and unreachable goals all occur; actions are distinct by construction.
fn graph_strategy() -> impl Strategy<Value = RuleGraph> {
    let names = vec![
        "fact_a", "fact_b", "fact_c", "rule_0", "rule_1", "rule_2", "rule_3",
    ];
    prop::collection::vec(
        (
            prop::collection::vec(prop::sample::select(names), 1 .. 4),
            prop::bool::ANY,
            prop::bool::ANY,
            prop::sample::select(vec!["alpha", "beta"]),
        ),
        1 .. 5,
    )
    .prop_map(|entries| {
        let records: Vec<RuleRecord> = entries
            .into_iter()
            .enumerate()
            .map(|(index, (conditions, is_goal, use_or, category))| {
                let operator = if use_or { Operator::Or } else { Operator::And };
                let record = RuleRecord::new(
                    format!("rule_{index}"),
                    conditions.iter().map(ToString::to_string).collect(),
                    operator,
                    category,
                );
                if is_goal { record.goal() } else { record }
            })
            .collect();
        RuleGraph::load(records).expect("generated actions are distinct")
    })
}

proptest! {
    #[test]
    fn replaying_a_history_reproduces_the_snapshot(
        replies in prop::collection::vec(tri_state_strategy(), 0 .. 6)
    ) {
        let manager = SessionManager::in_memory(Arc::new(consultation_graph()));
        let session_id = SessionId::new("replay");
        manager.start(session_id.clone(), &[]).expect("fixture graph is serviceable");

        let original = drive(&manager, &session_id, &replies);
        let depth = original.answered.len();
        let recorded: Vec<TriState> =
            original.answered.iter().map(|event| event.value).collect();

        manager.back(&session_id, depth).expect("full rollback stays in range");
        let replayed = drive(&manager, &session_id, &recorded);
        prop_assert_eq!(replayed, original);
    }

    #[test]
    fn observation_is_stable_between_mutations(
        replies in prop::collection::vec(tri_state_strategy(), 0 .. 6)
    ) {
        let manager = SessionManager::in_memory(Arc::new(consultation_graph()));
        let session_id = SessionId::new("observe");
        manager.start(session_id.clone(), &[]).expect("fixture graph is serviceable");

        let driven = drive(&manager, &session_id, &replies);
        let observed = manager.current_state(&session_id).expect("session exists");
        prop_assert_eq!(&observed, &driven);
        prop_assert_eq!(
            observed.next_question.is_none(),
            observed.diagnosis.is_some(),
            "diagnosis appears exactly when questioning is exhausted"
        );
    }

    #[test]
    fn terminal_statuses_never_regress(
        replies in prop::collection::vec(tri_state_strategy(), 1 .. 6)
    ) {
        let manager = SessionManager::in_memory(Arc::new(consultation_graph()));
        let session_id = SessionId::new("monotone");
        manager.start(session_id.clone(), &[]).expect("fixture graph is serviceable");

        let mut settled: BTreeMap<String, RuleStatus> = BTreeMap::new();
        for reply in replies {
            let snapshot = match manager.answer(&session_id, reply) {
                Ok(snapshot) => snapshot,
                Err(EngineError::NoActiveQuestion { .. }) => break,
                Err(error) => panic!("unexpected engine error: {error}"),
            };
            for report in &snapshot.rule_reports {
                if let Some(previous) = settled.get(report.action.as_str()) {
                    prop_assert_eq!(*previous, report.status);
                }
                if report.status.is_terminal() {
                    settled.insert(report.action.as_str().to_string(), report.status);
                }
            }
        }
    }

    #[test]
    fn arbitrary_graphs_terminate_or_are_refused(
        graph in graph_strategy(),
        replies in prop::collection::vec(tri_state_strategy(), 0 .. 10)
    ) {
        let manager = SessionManager::in_memory(Arc::new(graph));
        let session_id = SessionId::new("generated");
        match manager.start(session_id.clone(), &[]) {
            Err(EngineError::GraphInvalid { report }) => {
                prop_assert!(!report.is_serviceable());
                return Ok(());
            }
            Err(error) => panic!("unexpected engine error: {error}"),
            Ok(_) => {}
        }

        // Three leaf facts exist in the name pool, so questioning must
        // exhaust well within the reply budget.
        let mut exhausted = false;
        for reply in replies {
            match manager.answer(&session_id, reply) {
                Ok(_) => {}
                Err(EngineError::NoActiveQuestion { .. }) => {
                    exhausted = true;
                    break;
                }
                Err(error) => panic!("unexpected engine error: {error}"),
            }
        }
        let snapshot = manager.current_state(&session_id).expect("session exists");
        if snapshot.next_question.is_none() {
            prop_assert!(snapshot.diagnosis.is_some());
        } else {
            prop_assert!(!exhausted);
        }
    }
}
