//! Schema registry: node types, relation templates and native relations.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::defaults;
use super::error::SchemaError;
use super::file::SchemaFile;
use super::native::{self, NativeRelation, NATIVE_RELATIONS};
use super::node::NodeType;
use super::relation::{RelationTemplate, TemplateId};

/// Relation label that matches every template.
pub const WILDCARD_LABEL: &str = "Has Any Relation To";

/// Immutable, validated schema for one graph.
///
/// Built once and passed by reference to everything that compiles queries.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    node_types: Vec<NodeType>,
    relations: Vec<RelationTemplate>,
    fingerprint: String,
}

impl SchemaRegistry {
    /// Validate and build a registry.
    pub fn new(
        node_types: Vec<NodeType>,
        relations: Vec<RelationTemplate>,
    ) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for node_type in &node_types {
            if !seen.insert(node_type.type_id.as_str()) {
                return Err(SchemaError::DuplicateNodeType(node_type.type_id.clone()));
            }
        }

        for relation in &relations {
            relation.validate()?;
            for type_id in [&relation.source, &relation.destination] {
                if !seen.contains(type_id.as_str()) {
                    return Err(SchemaError::UnknownNodeType {
                        relation: relation.label.clone(),
                        type_id: type_id.clone(),
                    });
                }
            }
        }

        Ok(Self::from_parts(node_types, relations))
    }

    /// The built-in discourse schema.
    pub fn with_defaults() -> Self {
        Self::from_parts(defaults::node_types(), defaults::relations())
    }

    fn from_parts(node_types: Vec<NodeType>, relations: Vec<RelationTemplate>) -> Self {
        let file = SchemaFile {
            node_types,
            relations,
        };
        // Plain string fields only, so serialization cannot fail.
        let canonical = serde_json::to_vec(&file).unwrap_or_default();
        Self {
            node_types: file.node_types,
            relations: file.relations,
            fingerprint: hex::encode(Sha256::digest(&canonical)),
        }
    }

    /// Load a schema file (`.toml`, `.json`, `.yaml`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        SchemaFile::load(path)?.try_into()
    }

    /// The serializable form of this registry.
    pub fn to_file(&self) -> SchemaFile {
        SchemaFile {
            node_types: self.node_types.clone(),
            relations: self.relations.clone(),
        }
    }

    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    /// Lookup by label, ignoring case.
    pub fn node_type_by_label(&self, label: &str) -> Option<&NodeType> {
        let label = label.trim();
        self.node_types
            .iter()
            .find(|t| t.label.eq_ignore_ascii_case(label))
    }

    /// Lookup by type id.
    pub fn node_type(&self, type_id: &str) -> Option<&NodeType> {
        self.node_types.iter().find(|t| t.type_id == type_id)
    }

    /// The type a piece of text denotes: a label first, then the first
    /// declared format that matches it as a title.
    pub fn node_type_by_title(&self, title: &str) -> Option<&NodeType> {
        self.node_type_by_label(title)
            .or_else(|| self.node_types.iter().find(|t| t.matches_title(title)))
    }

    /// Every type whose format matches `title`, in declaration order.
    pub fn format_matches(&self, title: &str) -> Vec<&NodeType> {
        self.node_types
            .iter()
            .filter(|t| t.matches_title(title))
            .collect()
    }

    pub fn relations(&self) -> &[RelationTemplate] {
        &self.relations
    }

    /// Templates paired with their ids, in declaration order.
    pub fn templates(&self) -> impl Iterator<Item = (TemplateId, &RelationTemplate)> {
        self.relations
            .iter()
            .enumerate()
            .map(|(i, t)| (TemplateId(i), t))
    }

    pub fn template(&self, id: TemplateId) -> Option<&RelationTemplate> {
        self.relations.get(id.0)
    }

    pub fn native(&self, label: &str) -> Option<&'static NativeRelation> {
        native::lookup(label)
    }

    pub fn is_wildcard(&self, label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(WILDCARD_LABEL)
    }

    /// Labels offered to users: template labels and complements plus native
    /// labels, sorted and deduplicated, with the wildcard last.
    pub fn relation_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .labels_without_wildcard()
            .into_iter()
            .filter(|l| !self.is_wildcard(l))
            .collect();
        labels.push(WILDCARD_LABEL.to_string());
        labels
    }

    /// Every recognised relation label, wildcard included.
    pub fn all_relation_labels(&self) -> BTreeSet<String> {
        let mut labels = self.labels_without_wildcard();
        labels.insert(WILDCARD_LABEL.to_string());
        labels
    }

    fn labels_without_wildcard(&self) -> BTreeSet<String> {
        self.relations
            .iter()
            .flat_map(|r| [r.label.clone(), r.complement.clone()])
            .chain(NATIVE_RELATIONS.iter().map(|n| n.label.to_string()))
            .collect()
    }

    /// SHA-256 over the canonical JSON form of the schema.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl TryFrom<SchemaFile> for SchemaRegistry {
    type Error = SchemaError;

    fn try_from(file: SchemaFile) -> Result<Self, Self::Error> {
        Self::new(file.node_types, file.relations)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
