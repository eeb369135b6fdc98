//! Title format patterns.
//!
//! A node type declares how titles of its pages look, e.g. `[[CLM]] - {content}`.
//! The single `{...}` group is the free-text placeholder; everything around it
//! is literal text that must appear verbatim.

/// A parsed format: literal prefix and suffix around one placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    prefix: String,
    suffix: String,
    has_placeholder: bool,
}

impl FormatPattern {
    /// Split a format at its first `{...}` group.
    ///
    /// A format without a placeholder only matches its exact text.
    pub fn parse(format: &str) -> Self {
        match placeholder_span(format) {
            Some((start, end)) => Self {
                prefix: format[..start].to_string(),
                suffix: format[end..].to_string(),
                has_placeholder: true,
            },
            None => Self {
                prefix: format.to_string(),
                suffix: String::new(),
                has_placeholder: false,
            },
        }
    }

    /// Match a title, returning the free-text part on success.
    pub fn matches<'t>(&self, title: &'t str) -> Option<&'t str> {
        if !self.has_placeholder {
            return (title == self.prefix).then_some("");
        }
        title
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())
    }

    /// Build a title of this format around the given text.
    pub fn render(&self, content: &str) -> String {
        if self.has_placeholder {
            format!("{}{}{}", self.prefix, content, self.suffix)
        } else {
            self.prefix.clone()
        }
    }

    /// Anchored regular expression equivalent to [`FormatPattern::matches`].
    pub fn to_regex(&self) -> String {
        if self.has_placeholder {
            format!(
                "^{}(.*?){}$",
                regex::escape(&self.prefix),
                regex::escape(&self.suffix)
            )
        } else {
            format!("^{}$", regex::escape(&self.prefix))
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// Byte span of the first `{...}` group, braces included.
fn placeholder_span(format: &str) -> Option<(usize, usize)> {
    let start = format.find('{')?;
    let close = format[start..].find('}')?;
    Some((start, start + close + 1))
}

/// Match `title` against `format`, returning the captured free text.
pub fn matches<'t>(format: &str, title: &'t str) -> Option<&'t str> {
    FormatPattern::parse(format).matches(title)
}
