//! Relation resolution.
//!
//! Decides, per condition, which native relation or which templates (and in
//! which orientation) the relation label refers to, taking the node types of
//! the condition's source and target into account.

use tracing::debug;

use crate::schema::{NativeRelation, NodeType, Orientation, RelationTemplate, SchemaRegistry, TemplateId};

use super::condition::{Condition, Query};
use super::error::CompileWarning;

/// What a condition's relation resolved to.
#[derive(Debug, Clone, Copy)]
pub enum RelationRef<'r> {
    Native(&'static NativeRelation),
    Template {
        id: TemplateId,
        template: &'r RelationTemplate,
        orientation: Orientation,
    },
}

/// Result of resolving one condition.
#[derive(Debug, Clone, Default)]
pub struct Resolution<'r> {
    pub refs: Vec<RelationRef<'r>>,
    pub warnings: Vec<CompileWarning>,
}

impl Resolution<'_> {
    pub fn is_unresolved(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Type information known about one side of a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Side<'r> {
    /// A single node type.
    Typed(&'r NodeType),
    /// Anything goes: a query variable, or text no format recognises.
    Open,
    /// Several formats match; the side matches nothing.
    Ambiguous,
}

impl Side<'_> {
    fn accepts(&self, type_id: &str) -> bool {
        match self {
            Side::Typed(node_type) => node_type.type_id == type_id,
            Side::Open => true,
            Side::Ambiguous => false,
        }
    }
}

pub struct Resolver<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Resolver<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Resolve the relation of `condition`, a member of `query`.
    pub fn resolve(&self, condition: &Condition, query: &Query) -> Resolution<'r> {
        let mut resolution = Resolution::default();

        if let Some(native) = self.registry.native(&condition.relation) {
            resolution.refs.push(RelationRef::Native(native));
            return resolution;
        }

        let source = self.classify(condition, &condition.source, query, &mut resolution.warnings);
        let target = self.classify(condition, &condition.target, query, &mut resolution.warnings);
        let relation = condition.relation.trim();
        let wildcard = self.registry.is_wildcard(relation);

        for (id, template) in self.registry.templates() {
            let forward = (wildcard || relation == template.label)
                && source.accepts(&template.source)
                && target.accepts(&template.destination);
            if forward {
                resolution.refs.push(RelationRef::Template {
                    id,
                    template,
                    orientation: Orientation::Forward,
                });
            }

            // The wildcard only takes both orientations between equally
            // typed endpoints.
            let reverse_label = if wildcard {
                !forward || template.source == template.destination
            } else {
                relation == template.complement
            };
            if reverse_label
                && source.accepts(&template.destination)
                && target.accepts(&template.source)
            {
                resolution.refs.push(RelationRef::Template {
                    id,
                    template,
                    orientation: Orientation::Reverse,
                });
            }
        }

        if resolution.is_unresolved() {
            resolution.warnings.push(CompileWarning::UnresolvedRelation {
                condition: condition.uid.clone(),
                relation: condition.relation.clone(),
            });
        }

        debug!(
            condition = %condition.uid,
            relation = %condition.relation,
            matches = resolution.refs.len(),
            "Resolved condition"
        );

        resolution
    }

    fn classify(
        &self,
        condition: &Condition,
        text: &str,
        query: &Query,
        warnings: &mut Vec<CompileWarning>,
    ) -> Side<'r> {
        if let Some(node_type) = self.registry.node_type_by_label(text) {
            return Side::Typed(node_type);
        }
        if query.is_variable(text) {
            return Side::Open;
        }

        let matches = self.registry.format_matches(text);
        match matches.as_slice() {
            [] => Side::Open,
            [node_type] => Side::Typed(*node_type),
            many => {
                warnings.push(CompileWarning::AmbiguousTypeMatch {
                    condition: condition.uid.clone(),
                    text: text.to_string(),
                    candidates: many.iter().map(|t| t.type_id.clone()).collect(),
                });
                Side::Ambiguous
            }
        }
    }
}
