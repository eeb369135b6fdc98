use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_QUERY_LABEL_PREFIX;

/// A labelled query persisted in its line form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub label: String,
    pub lines: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SavedQuery {
    pub fn new(label: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            label: label.into(),
            lines,
            created_at: Utc::now(),
        }
    }
}

/// `Query N`, with N one past the highest number already used.
pub fn next_label<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let highest = existing
        .into_iter()
        .filter_map(label_number)
        .max()
        .unwrap_or(0);
    format!("{} {}", DEFAULT_QUERY_LABEL_PREFIX, highest + 1)
}

fn label_number(label: &str) -> Option<u32> {
    label
        .strip_prefix(DEFAULT_QUERY_LABEL_PREFIX)?
        .strip_prefix(' ')?
        .parse()
        .ok()
}
