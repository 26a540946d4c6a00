// crates/consult-core/src/core/rule.rs
// ============================================================================
// Module: Rule Graph
// Description: Rule records, load-time condition resolution, and the rule graph.
// Purpose: Turn ordered rule records into an immutable, index-backed graph.
// Dependencies: crate::core::{errors, identifiers}, consult-logic, serde, smallvec
// ============================================================================

//! ## Overview
//! Authoring surfaces hand the engine a complete, ordered list of rule
//! records. Loading builds an index keyed by action and resolves every
//! condition string exactly once: a condition naming an existing rule's
//! action becomes a derived reference, anything else is a leaf fact.
//! Loading fails only on duplicate actions; cycles and dangling references
//! are the validator's job, so a temporarily broken graph stays loadable for
//! the rule-management surface.
//!
//! The graph is immutable after load and shared read-only across sessions.
//! Reorganizing produces a new graph value rather than mutating in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use consult_logic::Operator;

use crate::core::errors::DuplicateAction;
use crate::core::errors::GraphLoadError;
use crate::core::identifiers::Category;
use crate::core::identifiers::FactName;
use crate::core::identifiers::RuleAction;

// ============================================================================
// SECTION: Rule Records
// ============================================================================

/// Unresolved rule description as supplied by the authoring surface.
///
/// # Invariants
/// - `conditions` order is significant: it drives question selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Conclusion identifier, unique across the rule set.
    pub action: String,
    /// Ordered condition texts (raw fact names or other rules' actions).
    pub conditions: Vec<String>,
    /// Operator combining the conditions.
    pub operator: Operator,
    /// Grouping tag, typically the outcome type.
    pub category: String,
    /// Whether the action is a terminal outcome to report.
    pub is_goal: bool,
}

impl RuleRecord {
    /// Creates a non-goal rule record.
    #[must_use]
    pub fn new(
        action: impl Into<String>,
        conditions: Vec<String>,
        operator: Operator,
        category: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            conditions,
            operator,
            category: category.into(),
            is_goal: false,
        }
    }

    /// Marks the record as a goal rule.
    #[must_use]
    pub const fn goal(mut self) -> Self {
        self.is_goal = true;
        self
    }
}

// ============================================================================
// SECTION: Resolved Conditions
// ============================================================================

/// A condition resolved at load time.
///
/// # Invariants
/// - Identity is purely textual; the variant records what the text resolved
///   to when the graph was loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Raw fact asked directly of the user.
    Leaf(FactName),
    /// Reference to the action of another rule.
    DerivedRef(RuleAction),
}

impl Condition {
    /// Returns the condition's textual identity.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Leaf(name) => name.as_str(),
            Self::DerivedRef(action) => action.as_str(),
        }
    }

    /// Returns true when the condition references another rule's action.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        matches!(self, Self::DerivedRef(_))
    }
}

// ============================================================================
// SECTION: Resolved Rules
// ============================================================================

/// Inline capacity for per-rule condition lists.
const CONDITION_INLINE: usize = 4;

/// A rule with conditions resolved against the full rule set.
///
/// # Invariants
/// - `action` is unique within the owning [`RuleGraph`].
/// - `position` is a total display order across all rules of the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Conclusion identifier and primary key.
    pub action: RuleAction,
    /// Ordered, resolved conditions.
    pub conditions: SmallVec<[Condition; CONDITION_INLINE]>,
    /// Operator combining the conditions.
    pub operator: Operator,
    /// Grouping tag.
    pub category: Category,
    /// Whether the action is a terminal outcome to report.
    pub is_goal: bool,
    /// Total display order across the graph.
    pub position: usize,
}

// ============================================================================
// SECTION: Rule Graph
// ============================================================================

/// Wire form of a rule graph: the rule list is the single source of truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphWire {
    /// Resolved rules in position order.
    rules: Vec<Rule>,
}

/// Immutable, validated-separately set of rules plus derived adjacency.
///
/// # Invariants
/// - `index` maps every rule's action to its slot in `rules`.
/// - `rules` is sorted by `position`.
/// - A graph deserialized from external storage may be internally
///   inconsistent and must pass the validator before serving sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphWire", into = "GraphWire")]
pub struct RuleGraph {
    /// Rules in position order.
    rules: Vec<Rule>,
    /// Action-to-slot index for derived-reference traversal.
    index: BTreeMap<RuleAction, usize>,
    /// Categories in first-appearance order; drives question sequencing.
    category_order: Vec<Category>,
}

impl From<GraphWire> for RuleGraph {
    fn from(wire: GraphWire) -> Self {
        Self::from_resolved(wire.rules)
    }
}

impl From<RuleGraph> for GraphWire {
    fn from(graph: RuleGraph) -> Self {
        Self {
            rules: graph.rules,
        }
    }
}

impl RuleGraph {
    /// Loads an ordered list of rule records into a resolved graph.
    ///
    /// Every condition string is resolved exactly once: it becomes a
    /// [`Condition::DerivedRef`] when a rule with that action exists anywhere
    /// in the record list, and a [`Condition::Leaf`] otherwise. Display
    /// positions follow declared order.
    ///
    /// # Errors
    ///
    /// Returns [`GraphLoadError::DuplicateActions`] listing every action that
    /// appears more than once. Cycles and dangling references do not fail the
    /// load; run the validator before offering the graph to sessions.
    pub fn load(records: Vec<RuleRecord>) -> Result<Self, GraphLoadError> {
        let mut counts = BTreeMap::new();
        for record in &records {
            *counts.entry(record.action.clone()).or_insert(0_usize) += 1;
        }

        let duplicates: Vec<DuplicateAction> = counts
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(action, count)| DuplicateAction {
                action: RuleAction::new(action.clone()),
                count: *count,
            })
            .collect();
        if !duplicates.is_empty() {
            return Err(GraphLoadError::DuplicateActions {
                duplicates,
            });
        }

        let actions: BTreeSet<&str> =
            records.iter().map(|record| record.action.as_str()).collect();

        let rules = records
            .iter()
            .enumerate()
            .map(|(position, record)| Rule {
                action: RuleAction::new(record.action.clone()),
                conditions: record
                    .conditions
                    .iter()
                    .map(|text| {
                        if actions.contains(text.as_str()) {
                            Condition::DerivedRef(RuleAction::new(text.clone()))
                        } else {
                            Condition::Leaf(FactName::new(text.clone()))
                        }
                    })
                    .collect(),
                operator: record.operator,
                category: Category::new(record.category.clone()),
                is_goal: record.is_goal,
                position,
            })
            .collect();

        Ok(Self::from_resolved(rules))
    }

    /// Builds a graph from already-resolved rules, keeping their positions.
    ///
    /// The index and category order are derived from the rule list. On
    /// inconsistent input (possible via deserialization) the later rule wins
    /// an index slot; the validator reports such defects.
    fn from_resolved(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(|rule| rule.position);

        let mut index = BTreeMap::new();
        let mut category_order: Vec<Category> = Vec::new();
        for (slot, rule) in rules.iter().enumerate() {
            index.insert(rule.action.clone(), slot);
            if !category_order.contains(&rule.category) {
                category_order.push(rule.category.clone());
            }
        }

        Self {
            rules,
            index,
            category_order,
        }
    }

    /// Builds a graph from reordered rules, reassigning display positions.
    ///
    /// Used by the organizer: the input order becomes the new total order.
    pub(crate) fn with_order(mut rules: Vec<Rule>) -> Self {
        for (position, rule) in rules.iter_mut().enumerate() {
            rule.position = position;
        }
        Self::from_resolved(rules)
    }

    /// Returns all rules in position order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up the rule producing `action`, if any.
    #[must_use]
    pub fn rule(&self, action: &RuleAction) -> Option<&Rule> {
        self.index.get(action).map(|slot| &self.rules[*slot])
    }

    /// Returns true when some rule produces `action`.
    #[must_use]
    pub fn produces(&self, action: &RuleAction) -> bool {
        self.index.contains_key(action)
    }

    /// Returns the rank of a category in first-appearance order.
    ///
    /// Unknown categories sort last, mirroring the original system's
    /// catch-all display rank.
    #[must_use]
    pub fn category_rank(&self, category: &Category) -> usize {
        self.category_order
            .iter()
            .position(|known| known == category)
            .unwrap_or(usize::MAX)
    }

    /// Returns goal rules in question-selection order.
    ///
    /// Goals are ordered by category rank first, then declared position.
    /// This fixed iteration order is what makes question sequencing
    /// reproducible.
    #[must_use]
    pub fn goals_in_ask_order(&self) -> Vec<&Rule> {
        let mut goals: Vec<&Rule> = self.rules.iter().filter(|rule| rule.is_goal).collect();
        goals.sort_by_key(|rule| (self.category_rank(&rule.category), rule.position));
        goals
    }

    /// Returns the number of rules in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the graph holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
