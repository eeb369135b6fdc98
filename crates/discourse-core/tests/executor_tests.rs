use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use discourse_core::{
    run_query, Condition, ConditionId, ExecutorError, Query, QueryCompiler, QueryExecutor,
    ResultSort, Row, SchemaRegistry, SearchResult,
};
use serde_json::json;

/// Records every query it receives and answers with fixed rows.
struct RecordingExecutor {
    rows: Vec<Row>,
    calls: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

impl RecordingExecutor {
    fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(&self, query: &str) -> Result<Vec<Row>, ExecutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        Ok(self.rows.clone())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct FailingExecutor;

#[async_trait]
impl QueryExecutor for FailingExecutor {
    async fn execute(&self, _query: &str) -> Result<Vec<Row>, ExecutorError> {
        Err(ExecutorError::Rejected("Invalid query".to_string()))
    }
}

fn evidence_query() -> Query {
    let mut query = Query::new("e");
    query.push(Condition::with_uid(ConditionId::new("c1"), "e", "is a", "Evidence"));
    query
}

fn row(text: &str, created: i64, edited: i64) -> Row {
    vec![json!({
        "text": text,
        "pageUid": format!("uid-{}", text),
        "createdTime": created,
        "editedTime": edited,
    })]
}

#[tokio::test]
async fn test_rows_are_returned() {
    let registry = SchemaRegistry::with_defaults();
    let compiled = QueryCompiler::new(&registry).compile(&evidence_query()).unwrap();
    let executor = RecordingExecutor::new(vec![row("[[EVD]] - Tide tables", 1, 2)]);

    let outcome = run_query(&executor, &compiled).await;

    assert!(!outcome.is_failure());
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(executor.calls(), 1);
    assert_eq!(
        executor.last_query.lock().unwrap().as_deref(),
        Some(compiled.text().as_str())
    );
}

#[tokio::test]
async fn test_failure_becomes_empty_outcome_with_diagnostic() {
    let registry = SchemaRegistry::with_defaults();
    let compiled = QueryCompiler::new(&registry).compile(&evidence_query()).unwrap();

    let outcome = run_query(&FailingExecutor, &compiled).await;

    assert!(outcome.rows.is_empty());
    let diagnostic = outcome.diagnostic.unwrap();
    assert_eq!(diagnostic.query, compiled.text());
    assert!(diagnostic.message.contains("Invalid query"));
}

#[tokio::test]
async fn test_unsatisfiable_query_skips_executor() {
    let registry = SchemaRegistry::with_defaults();
    let query = Query::new("e").with_condition("e", "refutes", "q");
    let compiled = QueryCompiler::new(&registry).compile(&query).unwrap();
    let executor = RecordingExecutor::new(vec![row("anything", 0, 0)]);

    let outcome = run_query(&executor, &compiled).await;

    assert!(outcome.rows.is_empty());
    assert!(!outcome.is_failure());
    assert_eq!(executor.calls(), 0);
}

#[tokio::test]
async fn test_query_without_conditions_skips_executor() {
    let registry = SchemaRegistry::with_defaults();
    let compiled = QueryCompiler::new(&registry).compile(&Query::new("e")).unwrap();
    let executor = RecordingExecutor::new(Vec::new());

    let outcome = run_query(&executor, &compiled).await;

    assert_eq!(outcome, Default::default());
    assert_eq!(executor.calls(), 0);
}

#[tokio::test]
async fn test_results_decode_and_sort() {
    let registry = SchemaRegistry::with_defaults();
    let compiled = QueryCompiler::new(&registry).compile(&evidence_query()).unwrap();
    let executor = RecordingExecutor::new(vec![
        row("b", 3, 10),
        row("A", 1, 30),
        vec![json!("not a map")],
        row("c", 2, 20),
    ]);

    let outcome = run_query(&executor, &compiled).await;
    let mut results = SearchResult::from_rows(&outcome.rows);
    assert_eq!(results.len(), 3);

    ResultSort::TitleAsc.sort(&mut results);
    let titles: Vec<_> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(titles, vec!["A", "b", "c"]);

    ResultSort::Latest.sort(&mut results);
    assert_eq!(results[0].text, "A");

    ResultSort::Youngest.sort(&mut results);
    assert_eq!(results[0].created_time, 1);
}
