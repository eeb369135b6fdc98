//! Decoded result rows and their orderings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Row;

/// One matched node, as pulled by the compiled query's projection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchResult {
    pub text: String,
    pub page_uid: String,
    pub created_time: i64,
    pub edited_time: i64,
}

impl SearchResult {
    /// Decode the pulled map in the first column of each row. Rows without a
    /// map are skipped.
    pub fn from_rows(rows: &[Row]) -> Vec<SearchResult> {
        rows.iter()
            .filter_map(|row| row.first())
            .filter_map(|value| serde_json::from_value(value.clone()).ok())
            .collect()
    }
}

/// Result orderings offered to users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultSort {
    #[default]
    #[serde(rename = "TITLE A->Z")]
    TitleAsc,
    #[serde(rename = "TITLE Z->A")]
    TitleDesc,
    /// Smallest creation time first.
    #[serde(rename = "YOUNGEST")]
    Youngest,
    #[serde(rename = "OLDEST")]
    Oldest,
    /// Smallest edit time first.
    #[serde(rename = "EARLIEST")]
    Earliest,
    #[serde(rename = "LATEST")]
    Latest,
}

impl ResultSort {
    pub const ALL: [ResultSort; 6] = [
        ResultSort::TitleAsc,
        ResultSort::TitleDesc,
        ResultSort::Youngest,
        ResultSort::Oldest,
        ResultSort::Earliest,
        ResultSort::Latest,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ResultSort::TitleAsc => "TITLE A->Z",
            ResultSort::TitleDesc => "TITLE Z->A",
            ResultSort::Youngest => "YOUNGEST",
            ResultSort::Oldest => "OLDEST",
            ResultSort::Earliest => "EARLIEST",
            ResultSort::Latest => "LATEST",
        }
    }

    pub fn compare(&self, a: &SearchResult, b: &SearchResult) -> Ordering {
        match self {
            ResultSort::TitleAsc => compare_text(a, b),
            ResultSort::TitleDesc => compare_text(b, a),
            ResultSort::Youngest => a.created_time.cmp(&b.created_time),
            ResultSort::Oldest => b.created_time.cmp(&a.created_time),
            ResultSort::Earliest => a.edited_time.cmp(&b.edited_time),
            ResultSort::Latest => b.edited_time.cmp(&a.edited_time),
        }
    }

    /// Stable sort in place.
    pub fn sort(&self, results: &mut [SearchResult]) {
        results.sort_by(|a, b| self.compare(a, b));
    }
}

fn compare_text(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.text
        .to_lowercase()
        .cmp(&b.text.to_lowercase())
        .then_with(|| a.text.cmp(&b.text))
}

impl fmt::Display for ResultSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResultSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ResultSort::ALL
            .into_iter()
            .find(|sort| sort.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sort '{}'", s))
    }
}
