//! Condition and query model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque per-condition identity, used to scope template-local variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(String);

impl ConditionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh short id.
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(8);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `source relation target` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub uid: ConditionId,
    /// Variable name the condition constrains.
    pub source: String,
    /// Relation label, complement label, native label or the wildcard.
    pub relation: String,
    /// Variable name, node type label or literal title.
    pub target: String,
}

impl Condition {
    /// Create a condition with a freshly generated id.
    pub fn new(
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::with_uid(ConditionId::generate(), source, relation, target)
    }

    pub fn with_uid(
        uid: ConditionId,
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            uid,
            source: source.into(),
            relation: relation.into(),
            target: target.into(),
        }
    }

    /// The serialized line for this condition.
    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.source, self.relation, self.target)
    }

    /// Whether two conditions say the same thing, ignoring ids.
    pub fn same_statement(&self, other: &Condition) -> bool {
        self.source == other.source && self.relation == other.relation && self.target == other.target
    }
}

/// A structural query: a return variable and ordered conditions.
///
/// Equality compares the return variable and the statements of the conditions
/// in order; condition ids are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Query {
    pub return_variable: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Query {
    pub fn new(return_variable: impl Into<String>) -> Self {
        Self {
            return_variable: return_variable.into(),
            conditions: Vec::new(),
        }
    }

    /// Builder-style condition append.
    pub fn with_condition(
        mut self,
        source: impl Into<String>,
        relation: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.conditions.push(Condition::new(source, relation, target));
        self
    }

    pub fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Whether `name` is a query variable: the return variable or the source
    /// of some condition.
    pub fn is_variable(&self, name: &str) -> bool {
        name == self.return_variable || self.conditions.iter().any(|c| c.source == name)
    }

    /// Names a condition at `index` may use as its source: the return
    /// variable, then the distinct targets of earlier conditions.
    pub fn source_candidates(&self, index: usize) -> Vec<String> {
        let mut candidates = vec![self.return_variable.clone()];
        for condition in self.conditions.iter().take(index) {
            if !condition.target.is_empty() && !candidates.contains(&condition.target) {
                candidates.push(condition.target.clone());
            }
        }
        candidates
    }

    pub fn condition(&self, uid: &ConditionId) -> Option<&Condition> {
        self.conditions.iter().find(|c| &c.uid == uid)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.return_variable == other.return_variable
            && self.conditions.len() == other.conditions.len()
            && self
                .conditions
                .iter()
                .zip(&other.conditions)
                .all(|(a, b)| a.same_statement(b))
    }
}

impl Eq for Query {}
