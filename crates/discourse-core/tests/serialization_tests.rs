use discourse_core::{
    Condition, NodeType, ParseError, Query, RelationTemplate, SchemaRegistry, StructuralTriple,
};
use proptest::prelude::*;

fn source_name() -> impl Strategy<Value = String> {
    // Sources never contain a space.
    proptest::string::string_regex("[a-z][A-Za-z0-9_-]{0,8}").unwrap()
}

fn target_text() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 \\[\\]@-]{0,20}").unwrap()
}

fn relation_label() -> impl Strategy<Value = String> {
    // Labels the compiler accepts regardless of case are written freely.
    let mut labels = SchemaRegistry::with_defaults().relation_labels();
    labels.extend(["has any relation to", "References", "IS A", "With Text"].map(String::from));
    proptest::sample::select(labels)
}

fn query_strategy() -> impl Strategy<Value = Query> {
    (
        source_name(),
        proptest::collection::vec((source_name(), relation_label(), target_text()), 0..6),
    )
        .prop_map(|(return_variable, conditions)| {
            let mut query = Query::new(return_variable);
            for (source, relation, target) in conditions {
                query.push(Condition::new(source, relation, target));
            }
            query
        })
}

proptest! {
    #[test]
    fn prop_lines_round_trip(query in query_strategy()) {
        let labels = SchemaRegistry::with_defaults().relation_labels();
        let lines = query.to_lines();
        let parsed = Query::from_lines(&lines, &labels).unwrap();

        prop_assert_eq!(&parsed, &query);
        prop_assert_eq!(parsed.to_lines(), lines);
    }
}

#[test]
fn test_longest_label_wins_over_wildcard_prefix() {
    let registry = SchemaRegistry::new(
        vec![NodeType::new("CLM", "Claim", "[[CLM]] - {content}")],
        vec![RelationTemplate::new(
            "Has Any Relation Tocustom",
            "Custom Of",
            "CLM",
            "CLM",
            vec![
                StructuralTriple::new("Page", "is a", "source"),
                StructuralTriple::new("Page", "references", "Other"),
                StructuralTriple::new("Other", "is a", "destination"),
            ],
        )],
    )
    .unwrap();
    let labels = registry.relation_labels();

    let query = Query::from_lines(&["Find X Where", "X Has Any Relation Tocustom Y"], &labels).unwrap();
    assert_eq!(query.conditions[0].relation, "Has Any Relation Tocustom");
    assert_eq!(query.conditions[0].target, "Y");

    let query = Query::from_lines(&["Find X Where", "X Has Any Relation To Y"], &labels).unwrap();
    assert_eq!(query.conditions[0].relation, "Has Any Relation To");
    assert_eq!(query.conditions[0].target, "Y");
}

#[test]
fn test_from_text_skips_blank_lines() {
    let labels = SchemaRegistry::with_defaults().relation_labels();
    let text = "Find e Where\n\ne Informs Question A\r\n   \ne is a Evidence\n";
    let query = Query::from_text(text, &labels).unwrap();

    assert_eq!(query.return_variable, "e");
    assert_eq!(query.conditions.len(), 2);
    assert_eq!(query.conditions[1].relation, "is a");
    assert_eq!(query.conditions[1].target, "Evidence");
}

#[test]
fn test_unknown_relation_reports_line() {
    let labels = SchemaRegistry::with_defaults().relation_labels();
    let err = Query::from_lines(&["Find e Where", "e Informs q", "e refutes q"], &labels).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownRelation {
            line: 3,
            text: "e refutes q".to_string()
        }
    );
}

#[test]
fn test_malformed_header() {
    let labels = SchemaRegistry::with_defaults().relation_labels();
    assert!(matches!(
        Query::from_lines(&["Select e"], &labels),
        Err(ParseError::MalformedHeader(_))
    ));
    assert_eq!(
        Query::from_lines::<&str, _>(&[], &labels),
        Err(ParseError::Empty)
    );
}

#[test]
fn test_parsed_conditions_get_fresh_ids() {
    let labels = SchemaRegistry::with_defaults().relation_labels();
    let lines = ["Find e Where", "e Informs q", "e Informs q"];
    let query = Query::from_lines(&lines, &labels).unwrap();
    assert_ne!(query.conditions[0].uid, query.conditions[1].uid);
}

#[test]
fn test_recased_wildcard_and_native_survive_a_reload() {
    let registry = SchemaRegistry::with_defaults();
    let query = Query::new("a")
        .with_condition("a", "has any relation to", "b")
        .with_condition("b", "References", "p");
    assert!(discourse_core::QueryCompiler::new(&registry)
        .compile(&query)
        .unwrap()
        .is_executable());

    let lines = query.to_lines();
    let parsed = Query::from_lines(&lines, &registry.relation_labels()).unwrap();
    assert_eq!(parsed, query);
    assert_eq!(parsed.to_lines(), lines);
}
