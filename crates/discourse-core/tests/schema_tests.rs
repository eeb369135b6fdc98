use discourse_core::schema::{defaults, WILDCARD_LABEL};
use discourse_core::{
    NodeType, Query, QueryCompiler, RelationTemplate, SchemaError, SchemaFile, SchemaRegistry,
    StructuralTriple,
};
use tempfile::TempDir;

const YAML_SCHEMA: &str = r#"
nodeTypes:
  - type: HYP
    label: Hypothesis
    format: "[[HYP]] - {content}"
  - type: RES
    label: Result
    format: "[[RES]] - {content}"
relations:
  - label: Confirms
    complementLabel: Confirmed By
    sourceType: RES
    destinationType: HYP
    triples:
      - ["Page", "is a", "source"]
      - ["Block", "references", "Page"]
      - ["Block", "is in page", "Target"]
      - ["Target", "is a", "destination"]
"#;

#[test]
fn test_yaml_schema_drives_compilation() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("schema.yaml");
    std::fs::write(&path, YAML_SCHEMA).unwrap();

    let registry = SchemaRegistry::from_file(&path).unwrap();
    assert_eq!(registry.node_types().len(), 2);
    assert_eq!(registry.relations()[0].complement, "Confirmed By");

    let query = Query::new("h").with_condition("h", "Confirmed By", "r");
    let compiled = QueryCompiler::new(&registry).compile(&query).unwrap();
    assert!(compiled.is_executable());
    assert!(compiled.body().starts_with("(or-join [?h]"));
}

#[test]
fn test_saved_schema_keeps_fingerprint() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("schema.toml");

    let registry = SchemaRegistry::with_defaults();
    registry.to_file().save(&path).unwrap();

    let reloaded = SchemaRegistry::from_file(&path).unwrap();
    assert_eq!(reloaded.fingerprint(), registry.fingerprint());
    assert_eq!(SchemaFile::load(&path).unwrap(), registry.to_file());
}

#[test]
fn test_fingerprint_changes_with_schema() {
    let base = SchemaRegistry::with_defaults();
    let mut node_types = defaults::node_types();
    node_types[0].format = "Q: {content}".to_string();
    let changed = SchemaRegistry::new(node_types, defaults::relations()).unwrap();

    assert_ne!(base.fingerprint(), changed.fingerprint());
}

#[test]
fn test_unknown_endpoint_type_rejected() {
    let result = SchemaRegistry::new(
        defaults::node_types(),
        vec![RelationTemplate::new(
            "Cites",
            "Cited By",
            "CLM",
            "PAPER",
            vec![
                StructuralTriple::new("?r", "Has Source", "source"),
                StructuralTriple::new("?r", "Has Destination", "destination"),
            ],
        )],
    );

    assert!(matches!(
        result,
        Err(SchemaError::UnknownNodeType { type_id, .. }) if type_id == "PAPER"
    ));
}

#[test]
fn test_duplicate_node_type_rejected() {
    let result = SchemaRegistry::new(
        vec![
            NodeType::new("CLM", "Claim", "[[CLM]] - {content}"),
            NodeType::new("CLM", "Conclusion", "[[CON]] - {content}"),
        ],
        Vec::new(),
    );
    assert!(matches!(result, Err(SchemaError::DuplicateNodeType(id)) if id == "CLM"));
}

#[test]
fn test_template_without_destination_rejected() {
    let result = SchemaRegistry::new(
        defaults::node_types(),
        vec![RelationTemplate::new(
            "Mentions",
            "Mentioned By",
            "CLM",
            "QUE",
            vec![StructuralTriple::new("Page", "is a", "source")],
        )],
    );
    assert!(matches!(
        result,
        Err(SchemaError::MissingAttachment { placeholder: "destination", .. })
    ));
}

#[test]
fn test_relation_labels_offer_wildcard_last() {
    let registry = SchemaRegistry::with_defaults();
    let labels = registry.relation_labels();

    assert_eq!(labels.last().map(String::as_str), Some(WILDCARD_LABEL));
    for expected in ["Informs", "Informed By", "Supported By", "is a", "with text"] {
        assert!(labels.iter().any(|l| l == expected), "{}", expected);
    }
    assert_eq!(
        labels.iter().filter(|l| l.as_str() == WILDCARD_LABEL).count(),
        1
    );
}

#[test]
fn test_title_lookup_through_formats() {
    let registry = SchemaRegistry::with_defaults();

    assert_eq!(
        registry.node_type_by_title("[[CLM]] - Tides follow the moon").map(|t| t.label.as_str()),
        Some("Claim")
    );
    assert_eq!(
        registry.node_type_by_title("@smith2020").map(|t| t.type_id.as_str()),
        Some("SOU")
    );
    assert!(registry.node_type_by_title("Daily notes").is_none());
}
