//! Built-in relations with a direct Datalog translation.
//!
//! Native relations need no template: each one maps `(source, target)` to a
//! fixed set of clauses over the host graph's attributes. Template triples
//! are written in terms of these same relations (`is a`, `references`,
//! `Has Title`, ...), so the rewriter reuses the translators below.

use crate::datalog::{Clause, Scope, Symbol, Term, Value};

pub const IS_A: &str = "is a";
pub const HAS_TITLE: &str = "has title";

/// What a native relation expects in its target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Another node, bound to a variable.
    Variable,
    /// Literal text.
    Literal,
    /// A declared node type.
    NodeType,
}

type Translator = fn(&Symbol, &Term, &Scope) -> Option<Vec<Clause>>;

/// A built-in relation label and its translator.
#[derive(Clone, Copy)]
pub struct NativeRelation {
    pub label: &'static str,
    pub target: TargetKind,
    translate: Translator,
}

impl NativeRelation {
    /// Translate `source <label> target` into clauses.
    ///
    /// Helper variables are created in `scope`. Returns `None` when the target
    /// term has the wrong shape for this relation (for example a node type
    /// given to `references`).
    pub fn translate(&self, source: &Symbol, target: &Term, scope: &Scope) -> Option<Vec<Clause>> {
        (self.translate)(source, target, scope)
    }
}

impl std::fmt::Debug for NativeRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeRelation")
            .field("label", &self.label)
            .field("target", &self.target)
            .finish()
    }
}

/// Every native relation, in display order.
pub static NATIVE_RELATIONS: &[NativeRelation] = &[
    NativeRelation {
        label: IS_A,
        target: TargetKind::NodeType,
        translate: is_a,
    },
    NativeRelation {
        label: "references",
        target: TargetKind::Variable,
        translate: references,
    },
    NativeRelation {
        label: "is in page",
        target: TargetKind::Variable,
        translate: is_in_page,
    },
    NativeRelation {
        label: HAS_TITLE,
        target: TargetKind::Literal,
        translate: has_title,
    },
    NativeRelation {
        label: "has attribute",
        target: TargetKind::Literal,
        translate: has_attribute,
    },
    NativeRelation {
        label: "has child",
        target: TargetKind::Variable,
        translate: has_child,
    },
    NativeRelation {
        label: "has parent",
        target: TargetKind::Variable,
        translate: has_parent,
    },
    NativeRelation {
        label: "has ancestor",
        target: TargetKind::Variable,
        translate: has_ancestor,
    },
    NativeRelation {
        label: "has descendant",
        target: TargetKind::Variable,
        translate: has_descendant,
    },
    NativeRelation {
        label: "with text",
        target: TargetKind::Literal,
        translate: with_text,
    },
];

/// Find a native relation by label, ignoring case and surrounding space.
pub fn lookup(label: &str) -> Option<&'static NativeRelation> {
    let label = label.trim();
    NATIVE_RELATIONS
        .iter()
        .find(|n| n.label.eq_ignore_ascii_case(label))
}

/// Membership through the type's title format.
///
/// ```text
/// [?s :node/title ?s-Title] [(re-pattern "^..$") ?s-CLM-Regex] [(re-find ?s-CLM-Regex ?s-Title)]
/// ```
pub fn membership(source: &Symbol, scope: &Scope, type_id: &str, regex: &str) -> Vec<Clause> {
    let title = source.helper(scope, "Title");
    let pattern = source.helper(scope, &format!("{}-Regex", type_id));
    vec![
        Clause::pattern(source.clone(), ":node/title", Value::Var(title.clone())),
        Clause::call(
            "re-pattern",
            vec![Value::Str(regex.to_string())],
            Some(pattern.clone()),
        ),
        Clause::call("re-find", vec![Value::Var(pattern), Value::Var(title)], None),
    ]
}

fn is_a(source: &Symbol, target: &Term, scope: &Scope) -> Option<Vec<Clause>> {
    match target {
        Term::Type(node_type) => Some(membership(
            source,
            scope,
            &node_type.type_id,
            &node_type.pattern().to_regex(),
        )),
        _ => None,
    }
}

fn node(target: &Term) -> Option<Value> {
    target.as_var().map(|v| Value::Var(v.clone()))
}

fn text(target: &Term) -> Option<Value> {
    match target {
        Term::Var(symbol) => Some(Value::Var(symbol.clone())),
        Term::Literal(text) => Some(Value::Str(text.clone())),
        Term::Type(_) => None,
    }
}

fn references(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    Some(vec![Clause::pattern(source.clone(), ":block/refs", node(target)?)])
}

fn is_in_page(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    Some(vec![Clause::pattern(source.clone(), ":block/page", node(target)?)])
}

fn has_title(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    Some(vec![Clause::pattern(source.clone(), ":node/title", text(target)?)])
}

fn has_attribute(source: &Symbol, target: &Term, scope: &Scope) -> Option<Vec<Clause>> {
    let name = text(target)?;
    let attribute = source.helper(scope, "Attribute");
    let block = source.helper(scope, "AttributeBlock");
    Some(vec![
        Clause::pattern(attribute.clone(), ":node/title", name),
        Clause::pattern(block.clone(), ":block/refs", Value::Var(attribute)),
        Clause::pattern(block, ":block/parents", Value::Var(source.clone())),
    ])
}

fn has_child(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    Some(vec![Clause::pattern(source.clone(), ":block/children", node(target)?)])
}

fn has_parent(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    let parent = target.as_var()?;
    Some(vec![Clause::pattern(
        parent.clone(),
        ":block/children",
        Value::Var(source.clone()),
    )])
}

fn has_ancestor(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    Some(vec![Clause::pattern(source.clone(), ":block/parents", node(target)?)])
}

fn has_descendant(source: &Symbol, target: &Term, _: &Scope) -> Option<Vec<Clause>> {
    let descendant = target.as_var()?;
    Some(vec![Clause::pattern(
        descendant.clone(),
        ":block/parents",
        Value::Var(source.clone()),
    )])
}

fn with_text(source: &Symbol, target: &Term, scope: &Scope) -> Option<Vec<Clause>> {
    let needle = text(target)?;
    let string = source.helper(scope, "String");
    Some(vec![
        Clause::Or(vec![
            Clause::pattern(source.clone(), ":block/string", Value::Var(string.clone())),
            Clause::pattern(source.clone(), ":node/title", Value::Var(string.clone())),
        ]),
        Clause::call(
            "clojure.string/includes?",
            vec![Value::Var(string), needle],
            None,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datalog::render_clauses;
    use crate::query::ConditionId;
    use crate::schema::NodeType;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup("Has Title").map(|n| n.label), Some(HAS_TITLE));
        assert_eq!(lookup(" IS A ").map(|n| n.label), Some(IS_A));
        assert!(lookup("supports").is_none());
    }

    #[test]
    fn test_references() {
        let clauses = lookup("references")
            .unwrap()
            .translate(&Symbol::query("b"), &Term::Var(Symbol::query("p")), &Scope::Query)
            .unwrap();
        assert_eq!(render_clauses(&clauses), "[?b :block/refs ?p]");
    }

    #[test]
    fn test_references_rejects_literal() {
        let native = lookup("references").unwrap();
        assert!(native
            .translate(&Symbol::query("b"), &Term::Literal("x".into()), &Scope::Query)
            .is_none());
    }

    #[test]
    fn test_has_parent_flips_direction() {
        let clauses = lookup("has parent")
            .unwrap()
            .translate(&Symbol::query("b"), &Term::Var(Symbol::query("p")), &Scope::Query)
            .unwrap();
        assert_eq!(render_clauses(&clauses), "[?p :block/children ?b]");
    }

    #[test]
    fn test_is_a_uses_title_format() {
        let claim = NodeType::new("CLM", "Claim", "[[CLM]] - {content}");
        let clauses = lookup(IS_A)
            .unwrap()
            .translate(&Symbol::query("c"), &Term::Type(claim.clone()), &Scope::Query)
            .unwrap();
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[0].to_string(), "[?c :node/title ?c-Title]");
        assert_eq!(
            clauses[1],
            Clause::call(
                "re-pattern",
                vec![Value::Str(claim.pattern().to_regex())],
                Some(Symbol::query("c-CLM-Regex")),
            )
        );
        assert_eq!(clauses[2].to_string(), "[(re-find ?c-CLM-Regex ?c-Title)]");
    }

    #[test]
    fn test_helpers_live_in_given_scope() {
        let uid = ConditionId::new("k1");
        let clauses = lookup("has attribute")
            .unwrap()
            .translate(
                &Symbol::query("c"),
                &Term::Literal("Status".into()),
                &Scope::Instance(uid),
            )
            .unwrap();
        assert_eq!(
            render_clauses(&clauses),
            r#"[?k1-c-Attribute :node/title "Status"] [?k1-c-AttributeBlock :block/refs ?k1-c-Attribute] [?k1-c-AttributeBlock :block/parents ?c]"#
        );
    }

    #[test]
    fn test_with_text() {
        let clauses = lookup("with text")
            .unwrap()
            .translate(&Symbol::query("b"), &Term::Literal("tide".into()), &Scope::Query)
            .unwrap();
        assert_eq!(
            render_clauses(&clauses),
            r#"(or [?b :block/string ?b-String] [?b :node/title ?b-String]) [(clojure.string/includes? ?b-String "tide")]"#
        );
    }
}
