// crates/consult-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Backward-Chaining Evaluator
// Description: Goal-driven tri-state evaluation, question selection, and reports.
// Purpose: Derive rule statuses, the next askable fact, and the diagnosis
//          from (rule graph, fact store) with no side effects.
// Dependencies: crate::core, consult-logic
// ============================================================================

//! ## Overview
//! Inference runs from goals downward to the specific facts needed to decide
//! them, asking only what is relevant. One [`Evaluation`] memoizes rule
//! values for a single pass over an immutable fact store; the memo never
//! survives into the next pass, because facts change between passes.
//!
//! Rule values combine condition values in declared order with deterministic
//! short-circuiting. The identical scan order governs askability: under AND
//! no leaf after an earlier `False` is worth asking, under OR none after an
//! earlier `True`. Goals are visited by category rank, then declared
//! position, which makes question sequencing reproducible and testable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use consult_logic::TriState;

use crate::core::facts::FactStore;
use crate::core::identifiers::FactName;
use crate::core::identifiers::RuleAction;
use crate::core::report::ApplicableOutcome;
use crate::core::report::ConditionReport;
use crate::core::report::ConditionalOutcome;
use crate::core::report::DiagnosisResult;
use crate::core::report::NeedTree;
use crate::core::report::RuleReport;
use crate::core::report::RuleStatus;
use crate::core::rule::Condition;
use crate::core::rule::Rule;
use crate::core::rule::RuleGraph;

// ============================================================================
// SECTION: Question Selection
// ============================================================================

/// The next fact worth asking, plus the rule path that led to it.
///
/// # Invariants
/// - `path` starts at a goal rule and ends at the rule whose leaf condition
///   is `fact`; every rule on it evaluated `Unknown` when selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSelection {
    /// The unanswered leaf fact to ask next.
    pub fact: FactName,
    /// Rules on the active recursion path from goal to the asking rule.
    pub path: Vec<RuleAction>,
}

// ============================================================================
// SECTION: Evaluation Pass
// ============================================================================

/// One memoized evaluation pass over an immutable fact store.
///
/// # Invariants
/// - Pure: never mutates the graph or the fact store.
/// - The memo is scoped to this pass; build a fresh [`Evaluation`] after any
///   history change.
#[derive(Debug)]
pub struct Evaluation<'a> {
    /// The validated, read-only rule graph.
    graph: &'a RuleGraph,
    /// The session's current facts.
    facts: &'a FactStore,
    /// Memoized rule values; absence means the rule was never touched.
    memo: BTreeMap<RuleAction, TriState>,
}

impl<'a> Evaluation<'a> {
    /// Creates a fresh evaluation pass.
    #[must_use]
    pub const fn new(graph: &'a RuleGraph, facts: &'a FactStore) -> Self {
        Self {
            graph,
            facts,
            memo: BTreeMap::new(),
        }
    }

    /// Evaluates a rule's combined tri-value, memoized for this pass.
    pub fn rule_value(&mut self, rule: &Rule) -> TriState {
        let mut stack = Vec::new();
        self.rule_value_guarded(rule, &mut stack)
    }

    /// Recursive evaluation with an explicit stack for cycle defense.
    ///
    /// A rule already on the recursion stack evaluates as `False`: a
    /// validator-passed graph cannot reach this branch, but a structurally
    /// broken graph must degrade to Blocked rather than recurse forever.
    fn rule_value_guarded(&mut self, rule: &Rule, stack: &mut Vec<RuleAction>) -> TriState {
        if let Some(value) = self.memo.get(&rule.action) {
            return *value;
        }
        if stack.contains(&rule.action) {
            return TriState::False;
        }
        stack.push(rule.action.clone());

        let mut values = Vec::with_capacity(rule.conditions.len());
        for condition in &rule.conditions {
            let value = self.condition_value_guarded(condition, stack);
            values.push(value);
            if rule.operator.is_moot_after(value) {
                break;
            }
        }
        let combined = rule.operator.combine(values);

        stack.pop();
        self.memo.insert(rule.action.clone(), combined);
        combined
    }

    /// Resolves one condition's value, recursing into derived references.
    ///
    /// A derived reference to an absent rule resolves to `Unknown`
    /// (fail-closed); the validator reports such references separately.
    fn condition_value_guarded(
        &mut self,
        condition: &Condition,
        stack: &mut Vec<RuleAction>,
    ) -> TriState {
        let graph = self.graph;
        match condition {
            Condition::Leaf(fact) => self.facts.value(fact),
            Condition::DerivedRef(action) => match graph.rule(action) {
                Some(sub) => self.rule_value_guarded(sub, stack),
                None => TriState::Unknown,
            },
        }
    }

    /// Returns a condition's value as visible after this pass.
    ///
    /// Leaves read the fact store directly. Derived references read the memo
    /// only: a reference short-circuited past is still untouched and reads
    /// `Unknown`.
    #[must_use]
    pub fn condition_value(&self, condition: &Condition) -> TriState {
        match condition {
            Condition::Leaf(fact) => self.facts.value(fact),
            Condition::DerivedRef(action) => {
                self.memo.get(action).copied().unwrap_or(TriState::Unknown)
            }
        }
    }

    // ========================================================================
    // SECTION: Next Question
    // ========================================================================

    /// Selects the single next-best question across all goals.
    ///
    /// Goals are visited by (category rank, declared position); resolved
    /// goals contribute no questions. Returns `None` when no askable leaf
    /// remains anywhere, which signals consultation completion.
    pub fn select_next_question(&mut self) -> Option<QuestionSelection> {
        let graph = self.graph;
        for goal in graph.goals_in_ask_order() {
            if self.rule_value(goal).is_definite() {
                continue;
            }
            let mut visited = BTreeSet::new();
            let mut path = Vec::new();
            if let Some(fact) = self.next_askable(goal, &mut visited, &mut path) {
                return Some(QuestionSelection {
                    fact,
                    path,
                });
            }
        }
        None
    }

    /// Depth-first search for the first askable leaf under one rule.
    ///
    /// Conditions are scanned in declared order. An unanswered leaf with an
    /// `Unknown` value is askable unless an earlier sibling already absorbed
    /// the combination (AND after a `False`, OR after a `True`); a fact the
    /// user explicitly answered as unknown is skipped but does not stop the
    /// scan. Derived `Unknown` conditions are expanded recursively. `path`
    /// accumulates the rule chain for status presentation and is unwound on
    /// dead ends.
    fn next_askable(
        &mut self,
        rule: &Rule,
        visited: &mut BTreeSet<RuleAction>,
        path: &mut Vec<RuleAction>,
    ) -> Option<FactName> {
        if !visited.insert(rule.action.clone()) {
            return None;
        }
        if self.rule_value(rule).is_definite() {
            return None;
        }

        path.push(rule.action.clone());
        let depth = path.len();
        let graph = self.graph;

        for condition in &rule.conditions {
            let value = match condition {
                Condition::Leaf(fact) => self.facts.value(fact),
                Condition::DerivedRef(action) => match graph.rule(action) {
                    Some(sub) => self.rule_value(sub),
                    None => TriState::Unknown,
                },
            };

            if value.is_unknown() {
                match condition {
                    Condition::Leaf(fact) => {
                        if self.facts.is_askable(fact) {
                            return Some(fact.clone());
                        }
                    }
                    Condition::DerivedRef(action) => {
                        if let Some(sub) = graph.rule(action) {
                            let mut sub_visited = visited.clone();
                            if let Some(fact) = self.next_askable(sub, &mut sub_visited, path) {
                                return Some(fact);
                            }
                            path.truncate(depth);
                        }
                    }
                }
            }

            if rule.operator.is_moot_after(value) {
                break;
            }
        }

        path.truncate(depth.saturating_sub(1));
        None
    }

    // ========================================================================
    // SECTION: Rule Reports
    // ========================================================================

    /// Builds a status snapshot for every rule in display order.
    ///
    /// Goals are evaluated first so the memo covers everything reachable
    /// under short-circuiting; rules never touched stay `Pending`. Rules on
    /// the path to the currently selected question show `Evaluating` instead
    /// of `Uncertain`.
    pub fn build_rule_reports(&mut self, selection: Option<&QuestionSelection>) -> Vec<RuleReport> {
        let graph = self.graph;
        for goal in graph.goals_in_ask_order() {
            let _ = self.rule_value(goal);
        }

        graph
            .rules()
            .iter()
            .map(|rule| {
                let status = match self.memo.get(&rule.action) {
                    None => RuleStatus::Pending,
                    Some(value) => {
                        let derived = RuleStatus::from_value(*value);
                        let on_path = selection
                            .is_some_and(|current| current.path.contains(&rule.action));
                        if derived == RuleStatus::Uncertain && on_path {
                            RuleStatus::Evaluating
                        } else {
                            derived
                        }
                    }
                };
                RuleReport {
                    action: rule.action.clone(),
                    category: rule.category.clone(),
                    operator: rule.operator,
                    is_goal: rule.is_goal,
                    position: rule.position,
                    status,
                    conditions: rule
                        .conditions
                        .iter()
                        .map(|condition| ConditionReport {
                            text: condition.text().to_string(),
                            value: self.condition_value(condition),
                            is_derived: condition.is_derived(),
                        })
                        .collect(),
                }
            })
            .collect()
    }

    // ========================================================================
    // SECTION: Diagnosis
    // ========================================================================

    /// Classifies every goal once no askable question remains.
    ///
    /// Fired goals are applicable; unknown goals are conditional with their
    /// remaining-unknown need tree; blocked goals are omitted entirely.
    pub fn build_diagnosis(&mut self) -> DiagnosisResult {
        let graph = self.graph;
        let mut applicable = Vec::new();
        let mut conditional = Vec::new();

        for goal in graph.goals_in_ask_order() {
            match self.rule_value(goal) {
                TriState::True => applicable.push(ApplicableOutcome {
                    action: goal.action.clone(),
                    category: goal.category.clone(),
                }),
                TriState::Unknown => {
                    let mut visited = BTreeSet::new();
                    let needs = self.need_tree(goal, &mut visited);
                    conditional.push(ConditionalOutcome {
                        action: goal.action.clone(),
                        category: goal.category.clone(),
                        needs,
                    });
                }
                TriState::False => {}
            }
        }

        let derived_facts = self
            .memo
            .iter()
            .filter(|(_, value)| value.is_true())
            .map(|(action, _)| action.clone())
            .collect();

        DiagnosisResult {
            applicable,
            conditional,
            derived_facts,
            unresolved_facts: self.facts.unresolved_facts(),
        }
    }

    /// Builds the minimal tree of remaining unknowns for an unresolved rule.
    ///
    /// Definite condition values are pruned: under AND a satisfied condition
    /// needs nothing further, under OR a failed alternative offers nothing.
    /// Derived unknowns expand into their own subtree; `visited` guards
    /// against revisiting a rule along one expansion path.
    fn need_tree(&mut self, rule: &Rule, visited: &mut BTreeSet<RuleAction>) -> NeedTree {
        visited.insert(rule.action.clone());
        let graph = self.graph;
        let mut branches = Vec::new();

        for condition in &rule.conditions {
            let value = match condition {
                Condition::Leaf(fact) => self.facts.value(fact),
                Condition::DerivedRef(action) => match graph.rule(action) {
                    Some(sub) => self.rule_value(sub),
                    None => TriState::Unknown,
                },
            };
            if value.is_definite() {
                continue;
            }
            match condition {
                Condition::Leaf(fact) => branches.push(NeedTree::Fact {
                    name: fact.clone(),
                }),
                Condition::DerivedRef(action) => {
                    if visited.contains(action) {
                        continue;
                    }
                    if let Some(sub) = graph.rule(action) {
                        let mut sub_visited = visited.clone();
                        branches.push(self.need_tree(sub, &mut sub_visited));
                    }
                }
            }
        }

        NeedTree::Group {
            action: rule.action.clone(),
            operator: rule.operator,
            branches,
        }
    }
}
