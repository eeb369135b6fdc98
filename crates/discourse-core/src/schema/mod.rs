//! Discourse schema: node types, relation templates and native relations.
//!
//! ## Components
//!
//! - `NodeType` - a typed page with a title format such as `[[CLM]] - {content}`
//! - `RelationTemplate` - a discourse relation written as structural triples
//! - `NativeRelation` - built-in relations with a direct Datalog translation
//! - `SchemaRegistry` - validated lookup over all of the above

pub mod defaults;
mod error;
mod file;
pub mod format;
pub mod native;
mod node;
mod registry;
mod relation;

pub use error::SchemaError;
pub use file::SchemaFile;
pub use format::FormatPattern;
pub use native::{NativeRelation, TargetKind, NATIVE_RELATIONS};
pub use node::NodeType;
pub use registry::{SchemaRegistry, WILDCARD_LABEL};
pub use relation::{
    local_name, Orientation, Placeholder, RelationTemplate, StructuralTriple, TemplateId,
    DESTINATION_PLACEHOLDER, SOURCE_PLACEHOLDER,
};
