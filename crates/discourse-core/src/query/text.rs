//! Line form of a query.
//!
//! ```text
//! Find c Where
//! c Supports Question A
//! ```
//!
//! The first line names the return variable. Every other line is
//! `{source} {relation} {target}`; the source never contains a space, and the
//! relation is recovered by matching against the known relation labels.

use super::condition::{Condition, Query};
use super::error::ParseError;

const HEADER_PREFIX: &str = "Find ";
const HEADER_SUFFIX: &str = " Where";

impl Query {
    /// Serialize to lines.
    pub fn to_lines(&self) -> Vec<String> {
        std::iter::once(header(&self.return_variable))
            .chain(self.conditions.iter().map(Condition::to_line))
            .collect()
    }

    /// Serialize to newline-separated text.
    pub fn to_text(&self) -> String {
        self.to_lines().join("\n")
    }

    /// Parse lines produced by [`Query::to_lines`].
    ///
    /// Conditions receive fresh ids. When several labels fit a line the
    /// longest one wins.
    pub fn from_lines<L, S>(lines: &[L], labels: &[S]) -> Result<Self, ParseError>
    where
        L: AsRef<str>,
        S: AsRef<str>,
    {
        let (first, rest) = lines.split_first().ok_or(ParseError::Empty)?;
        let mut query = Query::new(parse_header(first.as_ref())?);

        for (offset, line) in rest.iter().enumerate() {
            query.push(parse_condition(offset + 2, line.as_ref(), labels)?);
        }

        Ok(query)
    }

    /// Parse newline-separated text, skipping blank lines.
    pub fn from_text<S: AsRef<str>>(text: &str, labels: &[S]) -> Result<Self, ParseError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .collect();
        Self::from_lines(&lines, labels)
    }
}

fn header(return_variable: &str) -> String {
    format!("{}{}{}", HEADER_PREFIX, return_variable, HEADER_SUFFIX)
}

fn parse_header(line: &str) -> Result<String, ParseError> {
    line.strip_prefix(HEADER_PREFIX)
        .and_then(|rest| rest.strip_suffix(HEADER_SUFFIX))
        .filter(|variable| !variable.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))
}

fn parse_condition<S: AsRef<str>>(
    line_number: usize,
    line: &str,
    labels: &[S],
) -> Result<Condition, ParseError> {
    let malformed = || ParseError::MalformedCondition {
        line: line_number,
        text: line.to_string(),
    };

    let (source, rest) = line.split_once(' ').ok_or_else(malformed)?;
    if source.is_empty() {
        return Err(malformed());
    }

    let length = longest_label(rest, labels).ok_or_else(|| ParseError::UnknownRelation {
        line: line_number,
        text: line.to_string(),
    })?;

    // Keep the relation as written; the compiler decides what its case means.
    let (relation, after) = rest.split_at(length);
    let target = after.strip_prefix(' ').unwrap_or(after);

    Ok(Condition::new(source, relation, target))
}

/// Byte length of the longest label that starts `text`, ignoring ASCII case,
/// and ends at a space or end of text.
fn longest_label<S: AsRef<str>>(text: &str, labels: &[S]) -> Option<usize> {
    labels
        .iter()
        .map(AsRef::as_ref)
        .filter(|label| !label.is_empty())
        .filter(|label| {
            let (Some(prefix), Some(after)) = (text.get(..label.len()), text.get(label.len()..)) else {
                return false;
            };
            prefix.eq_ignore_ascii_case(label) && (after.is_empty() || after.starts_with(' '))
        })
        .map(str::len)
        .max()
}
