//! Relation templates.
//!
//! A template describes how one discourse relation is represented in the
//! graph as a handful of structural triples. Two of its triples carry the
//! placeholders `source` and `destination` in object position; those are the
//! attachment points where the relation's endpoints plug in. Every other
//! variable is local to the template.

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::native::IS_A;

/// Object placeholder marking the source attachment triple.
pub const SOURCE_PLACEHOLDER: &str = "source";

/// Object placeholder marking the destination attachment triple.
pub const DESTINATION_PLACEHOLDER: &str = "destination";

/// `(subject, relation, object)` edge pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralTriple(pub String, pub String, pub String);

impl StructuralTriple {
    pub fn new(
        subject: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self(subject.into(), relation.into(), object.into())
    }

    pub fn subject(&self) -> &str {
        &self.0
    }

    pub fn relation(&self) -> &str {
        &self.1
    }

    pub fn object(&self) -> &str {
        &self.2
    }

    /// Whether this triple states type membership (`X is a <type>`), in which
    /// case its subject is the endpoint node itself.
    pub fn is_membership(&self) -> bool {
        self.1.trim().eq_ignore_ascii_case(IS_A)
    }
}

/// Strip the optional leading `?` from a template variable.
pub fn local_name(token: &str) -> &str {
    token.strip_prefix('?').unwrap_or(token)
}

/// One of the two attachment points of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Source,
    Destination,
}

impl Placeholder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placeholder::Source => SOURCE_PLACEHOLDER,
            Placeholder::Destination => DESTINATION_PLACEHOLDER,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            SOURCE_PLACEHOLDER => Some(Placeholder::Source),
            DESTINATION_PLACEHOLDER => Some(Placeholder::Destination),
            _ => None,
        }
    }
}

/// Which reading of a template a condition uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `label`: condition source is the template source.
    Forward,
    /// `complement`: condition source is the template destination.
    Reverse,
}

impl Orientation {
    /// Attachment point of the condition's source.
    pub fn source_placeholder(&self) -> Placeholder {
        match self {
            Orientation::Forward => Placeholder::Source,
            Orientation::Reverse => Placeholder::Destination,
        }
    }

    /// Attachment point of the condition's target.
    pub fn target_placeholder(&self) -> Placeholder {
        match self {
            Orientation::Forward => Placeholder::Destination,
            Orientation::Reverse => Placeholder::Source,
        }
    }
}

/// Index of a template inside its registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateId(pub usize);

/// A declared discourse relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationTemplate {
    /// Forward reading, source -> destination.
    pub label: String,
    /// Reverse reading, destination -> source.
    #[serde(alias = "complementLabel")]
    pub complement: String,
    /// Node type id of the source endpoint.
    #[serde(alias = "sourceType")]
    pub source: String,
    /// Node type id of the destination endpoint.
    #[serde(alias = "destinationType")]
    pub destination: String,
    pub triples: Vec<StructuralTriple>,
}

impl RelationTemplate {
    pub fn new(
        label: impl Into<String>,
        complement: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
        triples: Vec<StructuralTriple>,
    ) -> Self {
        Self {
            label: label.into(),
            complement: complement.into(),
            source: source.into(),
            destination: destination.into(),
            triples,
        }
    }

    /// Index of the triple carrying the given placeholder.
    pub fn attachment(&self, placeholder: Placeholder) -> Option<usize> {
        self.triples
            .iter()
            .position(|t| t.object() == placeholder.as_str())
    }

    /// Node type id expected at an attachment point.
    pub fn endpoint_type(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::Source => &self.source,
            Placeholder::Destination => &self.destination,
        }
    }

    /// Label read in the given orientation.
    pub fn label_for(&self, orientation: Orientation) -> &str {
        match orientation {
            Orientation::Forward => &self.label,
            Orientation::Reverse => &self.complement,
        }
    }

    /// Whether a token names a template variable.
    ///
    /// Variables are written with a leading `?` or appear as the subject of
    /// some triple. Placeholders are never variables.
    pub fn is_variable(&self, token: &str) -> bool {
        if Placeholder::from_token(token).is_some() {
            return false;
        }
        if token.starts_with('?') {
            return true;
        }
        self.triples
            .iter()
            .any(|t| local_name(t.subject()) == token)
    }

    /// Check the structural invariants of this template.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.label == self.complement {
            return Err(SchemaError::SelfComplementary(self.label.clone()));
        }

        for placeholder in [Placeholder::Source, Placeholder::Destination] {
            let count = self
                .triples
                .iter()
                .filter(|t| t.object() == placeholder.as_str())
                .count();
            match count {
                0 => {
                    return Err(SchemaError::MissingAttachment {
                        relation: self.label.clone(),
                        placeholder: placeholder.as_str(),
                    })
                }
                1 => {}
                _ => {
                    return Err(SchemaError::DuplicateAttachment {
                        relation: self.label.clone(),
                        placeholder: placeholder.as_str(),
                    })
                }
            }
        }

        // Two membership-style attachments on one subject would alias a single
        // local variable to both endpoints.
        if let (Some(s), Some(d)) = (
            self.attachment(Placeholder::Source),
            self.attachment(Placeholder::Destination),
        ) {
            let (s, d) = (&self.triples[s], &self.triples[d]);
            if s.is_membership()
                && d.is_membership()
                && local_name(s.subject()) == local_name(d.subject())
            {
                return Err(SchemaError::SharedAttachmentSubject(self.label.clone()));
            }
        }

        Ok(())
    }
}
