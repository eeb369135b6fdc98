//! On-disk schema representation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::node::NodeType;
use super::relation::RelationTemplate;

/// Serialized form of a schema, readable from TOML, JSON or YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default, alias = "nodeTypes")]
    pub node_types: Vec<NodeType>,

    #[serde(default)]
    pub relations: Vec<RelationTemplate>,
}

impl SchemaFile {
    /// Read a schema file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            _ => Err(SchemaError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, SchemaError> {
        toml::to_string_pretty(self).map_err(|e| SchemaError::Invalid(e.to_string()))
    }

    /// Write this schema as TOML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SchemaError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SchemaError::io(parent, e))?;
            }
        }
        std::fs::write(path, self.to_toml()?).map_err(|e| SchemaError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TOML_SCHEMA: &str = r#"
[[node_types]]
type = "CLM"
label = "Claim"
format = "[[CLM]] - {text}"

[[node_types]]
type = "QUE"
label = "Question"
format = "[[QUE]] - {text}"

[[relations]]
label = "supports"
complement = "is supported by"
source = "CLM"
destination = "QUE"
triples = [["?r", "Has Source", "source"], ["?r", "Has Destination", "destination"]]
"#;

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.toml");
        std::fs::write(&path, TOML_SCHEMA).unwrap();

        let schema = SchemaFile::load(&path).unwrap();
        assert_eq!(schema.node_types.len(), 2);
        assert_eq!(schema.relations[0].triples[1].object(), "destination");
    }

    #[test]
    fn test_load_json_with_camel_case_aliases() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(
            &path,
            r#"{
                "nodeTypes": [{"type": "CLM", "label": "Claim", "format": "[[CLM]] - {text}"}],
                "relations": [{
                    "label": "supports",
                    "complementLabel": "is supported by",
                    "sourceType": "CLM",
                    "destinationType": "CLM",
                    "triples": [["?r", "Has Source", "source"], ["?r", "Has Destination", "destination"]]
                }]
            }"#,
        )
        .unwrap();

        let schema = SchemaFile::load(&path).unwrap();
        assert_eq!(schema.relations[0].complement, "is supported by");
        assert_eq!(schema.relations[0].source, "CLM");
    }

    #[test]
    fn test_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schema.ini");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(
            SchemaFile::load(&path),
            Err(SchemaError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_toml_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("schema.toml");
        let schema: SchemaFile = toml::from_str(TOML_SCHEMA).unwrap();

        schema.save(&path).unwrap();
        assert_eq!(SchemaFile::load(&path).unwrap(), schema);
    }
}
