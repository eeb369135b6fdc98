use thiserror::Error;

use super::condition::ConditionId;

/// Structural problems that stop compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Query has no return variable")]
    BlankReturnVariable,

    #[error("Condition {index} has no source")]
    BlankSource { index: usize },

    #[error("Condition {index} has no relation")]
    BlankRelation { index: usize },

    #[error("Condition id {0} is used more than once")]
    DuplicateConditionId(ConditionId),

    #[error("'{0}' cannot name a variable (letters, digits and _*+!<>=. only)")]
    InvalidVariable(String),
}

/// Problems reading the serialized line form of a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Serialized query is empty")]
    Empty,

    #[error("Expected 'Find <variable> Where', got '{0}'")]
    MalformedHeader(String),

    #[error("Line {line}: no known relation in '{text}'")]
    UnknownRelation { line: usize, text: String },

    #[error("Line {line}: malformed condition '{text}'")]
    MalformedCondition { line: usize, text: String },
}

/// Soft problems found while compiling. The query still compiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileWarning {
    /// No native relation or compatible template for the condition.
    #[error("Condition {condition}: no relation matches '{relation}'")]
    UnresolvedRelation {
        condition: ConditionId,
        relation: String,
    },

    /// A side's text matched more than one node type format.
    #[error("Condition {condition}: '{text}' matches several node types ({})", candidates.join(", "))]
    AmbiguousTypeMatch {
        condition: ConditionId,
        text: String,
        candidates: Vec<String>,
    },

    /// An `is a` target that names no node type.
    #[error("Condition {condition}: '{text}' is not a node type")]
    UnresolvedType { condition: ConditionId, text: String },
}

impl CompileWarning {
    pub fn condition(&self) -> &ConditionId {
        match self {
            CompileWarning::UnresolvedRelation { condition, .. }
            | CompileWarning::AmbiguousTypeMatch { condition, .. }
            | CompileWarning::UnresolvedType { condition, .. } => condition,
        }
    }
}
