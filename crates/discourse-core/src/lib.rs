//! Discourse graph query compiler.
//!
//! Users declare typed discourse nodes (Question, Claim, Evidence, ...) and
//! relation templates made of structural triples. Queries are ordered lists
//! of `source relation target` conditions; this crate compiles them into a
//! single Datalog query for the host graph, runs it through a pluggable
//! executor and persists queries in a flat line form.

pub mod config;
pub mod datalog;
pub mod executor;
pub mod manager;
pub mod query;
pub mod schema;
pub mod storage;

pub use config::{
    Config, ConfigError, ExecutorConfig, LoggingConfig, QueryConfig, SchemaConfig, StorageConfig,
};
pub use executor::{
    run_query, ExecutionDiagnostic, ExecutorError, QueryExecutor, QueryOutcome, ResultSort,
    RoamApiExecutor, Row, SearchResult,
};
pub use manager::{ManagerError, QueryManager};
pub use query::{
    CompileCache, CompileError, CompileWarning, CompiledQuery, Condition, ConditionId,
    ParseError, Query, QueryCompiler,
};
pub use schema::{NodeType, RelationTemplate, SchemaError, SchemaFile, SchemaRegistry, StructuralTriple};
pub use storage::{FileStorage, SavedQuery, Storage, StorageError};
