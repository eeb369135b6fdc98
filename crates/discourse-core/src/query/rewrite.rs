//! Template instantiation.
//!
//! Rewrites the triples of one relation template for one condition. The
//! condition's source and target are plugged into the template's attachment
//! points according to the orientation; all other template variables become
//! symbols local to the condition.

use tracing::debug;

use crate::datalog::{attribute_keyword, Clause, Symbol, Term};
use crate::schema::native::{self, HAS_TITLE, IS_A};
use crate::schema::{
    local_name, NodeType, Orientation, Placeholder, RelationTemplate, SchemaRegistry,
    StructuralTriple,
};

use super::condition::Condition;
use super::symbol::SymbolTable;

/// How a condition endpoint is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<'a> {
    /// A query variable.
    Variable(Symbol),
    /// A declared node type, by label.
    Type(&'a NodeType),
    /// Literal title text.
    Literal(&'a str),
}

/// Rewrite `template` for `condition`, returning the clauses of one branch.
///
/// The condition's source is always bound as a query variable. The template
/// itself is left untouched.
pub fn rewrite(
    registry: &SchemaRegistry,
    template: &RelationTemplate,
    orientation: Orientation,
    condition: &Condition,
    target: &Binding<'_>,
) -> Vec<Clause> {
    let source = Binding::Variable(Symbol::query(condition.source.as_str()));
    let endpoint = |placeholder: Placeholder| {
        if placeholder == orientation.source_placeholder() {
            &source
        } else {
            target
        }
    };

    let mut table = SymbolTable::new(condition.uid.clone());

    // Membership-style attachments make the template variable the endpoint
    // itself, so it must be aliased before any triple is translated.
    for triple in &template.triples {
        if let Some(placeholder) = Placeholder::from_token(triple.object()) {
            if let (true, Binding::Variable(symbol)) = (triple.is_membership(), endpoint(placeholder)) {
                table.alias(local_name(triple.subject()), symbol.clone());
            }
        }
    }

    let mut clauses = Vec::new();
    for triple in &template.triples {
        let subject = table.resolve(local_name(triple.subject()));

        match Placeholder::from_token(triple.object()) {
            Some(placeholder) => {
                let endpoint_type = registry.node_type(template.endpoint_type(placeholder));
                attach(
                    &mut clauses,
                    &table,
                    triple,
                    subject,
                    placeholder,
                    endpoint(placeholder),
                    endpoint_type,
                );
            }
            None => {
                let object = object_term(registry, template, &table, triple);
                clauses.extend(translate(triple.relation(), &subject, &object, &table));
            }
        }
    }

    debug!(
        condition = %condition.uid,
        template = %template.label,
        ?orientation,
        clauses = clauses.len(),
        "Rewrote template"
    );

    clauses
}

/// Emit the clauses for an attachment triple.
fn attach(
    clauses: &mut Vec<Clause>,
    table: &SymbolTable,
    triple: &StructuralTriple,
    subject: Symbol,
    placeholder: Placeholder,
    binding: &Binding<'_>,
    endpoint_type: Option<&NodeType>,
) {
    // A bound title replaces the attachment triple with a title triple on
    // the same subject, whatever the attachment style.
    if let Binding::Literal(text) = binding {
        clauses.extend(translate(HAS_TITLE, &subject, &Term::Literal(text.to_string()), table));
        return;
    }

    if triple.is_membership() {
        // The subject is the endpoint node.
        if let Some(node_type) = endpoint_type {
            clauses.extend(translate(IS_A, &subject, &Term::Type(node_type.clone()), table));
        }
        return;
    }

    // The object is the endpoint node.
    match binding {
        Binding::Variable(symbol) => {
            clauses.extend(translate(triple.relation(), &subject, &Term::Var(symbol.clone()), table));
        }
        Binding::Literal(_) => {}
        Binding::Type(node_type) => {
            let node = Symbol::local(table.uid(), placeholder.as_str());
            let node_type = endpoint_type.unwrap_or(*node_type);
            clauses.extend(translate(triple.relation(), &subject, &Term::Var(node.clone()), table));
            clauses.extend(translate(IS_A, &node, &Term::Type(node_type.clone()), table));
        }
    }
}

/// Term for a non-attachment object.
fn object_term(
    registry: &SchemaRegistry,
    template: &RelationTemplate,
    table: &SymbolTable,
    triple: &StructuralTriple,
) -> Term {
    let object = triple.object();
    if template.is_variable(object) {
        return Term::Var(table.resolve(local_name(object)));
    }
    if triple.is_membership() {
        let node_type = registry
            .node_type(object)
            .or_else(|| registry.node_type_by_label(object));
        if let Some(node_type) = node_type {
            return Term::Type(node_type.clone());
        }
    }
    Term::Literal(object.to_string())
}

/// Translate one rewritten triple.
///
/// Native relation names use their translator; anything else, or a native
/// given a term of the wrong shape, becomes a plain attribute pattern.
fn translate(relation: &str, subject: &Symbol, object: &Term, table: &SymbolTable) -> Vec<Clause> {
    native::lookup(relation)
        .and_then(|n| n.translate(subject, object, &table.scope()))
        .unwrap_or_else(|| {
            vec![Clause::pattern(
                subject.clone(),
                attribute_keyword(relation),
                object.to_value(),
            )]
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalog::render_clauses;
    use crate::query::ConditionId;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new(
            vec![
                NodeType::new("CLM", "Claim", "[[CLM]] - {text}"),
                NodeType::new("QUE", "Question", "[[QUE]] - {text}"),
            ],
            vec![RelationTemplate::new(
                "supports",
                "is supported by",
                "CLM",
                "QUE",
                vec![
                    StructuralTriple::new("?r", "Has Source", "source"),
                    StructuralTriple::new("?r", "Has Destination", "destination"),
                ],
            )],
        )
        .unwrap()
    }

    fn condition(source: &str, relation: &str, target: &str) -> Condition {
        Condition::with_uid(ConditionId::new("c1"), source, relation, target)
    }

    #[test]
    fn test_edge_style_literal_target() {
        let registry = registry();
        let template = &registry.relations()[0];
        let clauses = rewrite(
            &registry,
            template,
            Orientation::Forward,
            &condition("c", "supports", "Question A"),
            &Binding::Literal("Question A"),
        );
        assert_eq!(
            render_clauses(&clauses),
            r#"[?c1-r :has-source ?c] [?c1-r :node/title "Question A"]"#
        );
    }

    #[test]
    fn test_reverse_literal_binds_source_attachment() {
        let registry = registry();
        let template = &registry.relations()[0];
        let clauses = rewrite(
            &registry,
            template,
            Orientation::Reverse,
            &condition("q", "is supported by", "Claim B"),
            &Binding::Literal("Claim B"),
        );
        assert_eq!(
            render_clauses(&clauses),
            r#"[?c1-r :node/title "Claim B"] [?c1-r :has-destination ?q]"#
        );
    }

    #[test]
    fn test_reverse_orientation_swaps_attachment() {
        let registry = registry();
        let template = &registry.relations()[0];
        let clauses = rewrite(
            &registry,
            template,
            Orientation::Reverse,
            &condition("q", "is supported by", "c"),
            &Binding::Variable(Symbol::query("c")),
        );
        assert_eq!(
            render_clauses(&clauses),
            "[?c1-r :has-source ?c] [?c1-r :has-destination ?q]"
        );
    }

    #[test]
    fn test_membership_style_aliases_subject() {
        let registry = SchemaRegistry::with_defaults();
        let template = registry
            .relations()
            .iter()
            .find(|t| t.label == "Informs")
            .unwrap();
        let clauses = rewrite(
            &registry,
            template,
            Orientation::Forward,
            &condition("e", "Informs", "[[QUE]] - Why?"),
            &Binding::Literal("[[QUE]] - Why?"),
        );
        let text = render_clauses(&clauses);

        assert!(text.starts_with("[?e :node/title ?c1-e-Title]"));
        assert!(text.contains("[?c1-Block :block/refs ?e]"));
        assert!(text.contains("[?c1-Block :block/page ?c1-ParentPage]"));
        assert!(text.ends_with(r#"[?c1-ParentPage :node/title "[[QUE]] - Why?"]"#));
        assert!(!text.contains("?c1-Page "));
    }

    #[test]
    fn test_type_target_on_edge_style() {
        let registry = registry();
        let template = &registry.relations()[0];
        let question = registry.node_type("QUE").unwrap();
        let clauses = rewrite(
            &registry,
            template,
            Orientation::Forward,
            &condition("c", "supports", "Question"),
            &Binding::Type(question),
        );
        let text = render_clauses(&clauses);
        assert!(text.contains("[?c1-r :has-destination ?c1-destination]"));
        assert!(text.contains("[?c1-destination :node/title ?c1-destination-Title]"));
    }

    #[test]
    fn test_template_is_not_mutated() {
        let registry = registry();
        let before = registry.relations()[0].clone();
        rewrite(
            &registry,
            &registry.relations()[0],
            Orientation::Forward,
            &condition("c", "supports", "q"),
            &Binding::Variable(Symbol::query("q")),
        );
        assert_eq!(registry.relations()[0], before);
    }
}
