use serde::{Deserialize, Serialize};

use super::format::FormatPattern;

/// A declared discourse node type (Claim, Question, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeType {
    /// Stable id, usually an abbreviation such as `CLM`.
    #[serde(rename = "type")]
    pub type_id: String,
    /// Display name, also usable as a query variable or target.
    pub label: String,
    /// Title format with one `{...}` placeholder.
    pub format: String,
}

impl NodeType {
    pub fn new(
        type_id: impl Into<String>,
        label: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            label: label.into(),
            format: format.into(),
        }
    }

    /// The parsed title format.
    pub fn pattern(&self) -> FormatPattern {
        FormatPattern::parse(&self.format)
    }

    /// Whether a page title belongs to this type.
    pub fn matches_title(&self, title: &str) -> bool {
        self.pattern().matches(title).is_some()
    }
}
