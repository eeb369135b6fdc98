use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Duplicate node type id: {0}")]
    DuplicateNodeType(String),

    #[error("Relation '{relation}' refers to undeclared node type '{type_id}'")]
    UnknownNodeType { relation: String, type_id: String },

    #[error("Relation '{0}' uses the same text for its label and complement")]
    SelfComplementary(String),

    #[error("Relation '{relation}' has no triple with object '{placeholder}'")]
    MissingAttachment {
        relation: String,
        placeholder: &'static str,
    },

    #[error("Relation '{relation}' has more than one triple with object '{placeholder}'")]
    DuplicateAttachment {
        relation: String,
        placeholder: &'static str,
    },

    #[error("Relation '{0}' attaches both endpoints to the same node")]
    SharedAttachmentSubject(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported schema file extension: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid schema: {0}")]
    Invalid(String),
}

impl SchemaError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }
}
