//! Query execution against a host graph.
//!
//! The compiler never talks to a store. A [`QueryExecutor`] sends compiled
//! query text somewhere and returns rows; [`run_query`] wraps that call so
//! failures reach the caller as an empty result plus a diagnostic.
//!
//! # Example
//!
//! ```ignore
//! let executor = RoamApiExecutor::from_config(&config.executor)?;
//! let compiled = QueryCompiler::new(&registry).compile(&query)?;
//! let outcome = run_query(&executor, &compiled).await;
//! let results = SearchResult::from_rows(&outcome.rows);
//! ```

mod error;
mod results;
mod roam;

pub use error::ExecutorError;
pub use results::{ResultSort, SearchResult};
pub use roam::RoamApiExecutor;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::query::CompiledQuery;

/// One result tuple.
pub type Row = Vec<serde_json::Value>;

/// Something that can evaluate Datalog query text.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run the query and return its rows.
    async fn execute(&self, query: &str) -> Result<Vec<Row>, ExecutorError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "executor"
    }
}

/// Why a query produced no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionDiagnostic {
    /// The full query text that was sent.
    pub query: String,
    pub message: String,
}

/// Rows of an executed query, and a diagnostic when execution failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub rows: Vec<Row>,
    pub diagnostic: Option<ExecutionDiagnostic>,
}

impl QueryOutcome {
    pub fn is_failure(&self) -> bool {
        self.diagnostic.is_some()
    }
}

/// Execute a compiled query.
///
/// Queries that cannot match anything (an unresolved condition, or no
/// clauses at all) return zero rows without reaching the executor. Executor
/// errors are logged together with the query text and turned into an empty
/// outcome carrying an [`ExecutionDiagnostic`].
pub async fn run_query(executor: &dyn QueryExecutor, compiled: &CompiledQuery) -> QueryOutcome {
    if !compiled.is_executable() {
        debug!(
            unsatisfiable = compiled.is_unsatisfiable(),
            "Skipping query with nothing to match"
        );
        return QueryOutcome::default();
    }

    let query = compiled.text();
    match executor.execute(&query).await {
        Ok(rows) => {
            debug!(executor = executor.name(), rows = rows.len(), "Query executed");
            QueryOutcome {
                rows,
                diagnostic: None,
            }
        }
        Err(e) => {
            error!(executor = executor.name(), error = %e, query = %query, "Query failed");
            QueryOutcome {
                rows: Vec::new(),
                diagnostic: Some(ExecutionDiagnostic {
                    query,
                    message: e.to_string(),
                }),
            }
        }
    }
}
