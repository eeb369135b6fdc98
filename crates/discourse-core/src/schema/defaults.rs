//! Built-in discourse schema.
//!
//! Four node types and three relation pairs, modelled the way discourse
//! relations are usually written down in an outliner: an evidence page is
//! referenced from a block that lives on (or under a labelled block on) the
//! question or claim page it bears on.

use super::node::NodeType;
use super::relation::{RelationTemplate, StructuralTriple};

pub fn node_types() -> Vec<NodeType> {
    vec![
        NodeType::new("QUE", "Question", "[[QUE]] - {content}"),
        NodeType::new("CLM", "Claim", "[[CLM]] - {content}"),
        NodeType::new("EVD", "Evidence", "[[EVD]] - {content}"),
        NodeType::new("SOU", "Source", "@{content}"),
    ]
}

pub fn relations() -> Vec<RelationTemplate> {
    vec![
        RelationTemplate::new(
            "Informs",
            "Informed By",
            "EVD",
            "QUE",
            vec![
                StructuralTriple::new("Page", "is a", "source"),
                StructuralTriple::new("Block", "references", "Page"),
                StructuralTriple::new("Block", "is in page", "ParentPage"),
                StructuralTriple::new("ParentPage", "is a", "destination"),
            ],
        ),
        labelled_child("Supports", "Supported By"),
        labelled_child("Opposes", "Opposed By"),
    ]
}

/// Evidence referenced under a `Supported By` / `Opposed By` block of a claim.
fn labelled_child(label: &str, complement: &str) -> RelationTemplate {
    RelationTemplate::new(
        label,
        complement,
        "EVD",
        "CLM",
        vec![
            StructuralTriple::new("Page", "is a", "source"),
            StructuralTriple::new("Block", "references", "Page"),
            StructuralTriple::new("SBlock", "references", "SPage"),
            StructuralTriple::new("SPage", "has title", complement),
            StructuralTriple::new("SBlock", "has child", "Block"),
            StructuralTriple::new("PBlock", "references", "ParentPage"),
            StructuralTriple::new("PBlock", "has child", "SBlock"),
            StructuralTriple::new("ParentPage", "is a", "destination"),
        ],
    )
}
