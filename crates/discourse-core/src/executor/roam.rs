use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ExecutorError, QueryExecutor, Row};
use crate::config::{ExecutorConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

/// Executes queries against a hosted graph through the Roam backend API.
pub struct RoamApiExecutor {
    base_url: String,
    graph: String,
    api_token: String,
    client: Client,
}

impl RoamApiExecutor {
    /// Creates an executor for `graph` with the given API token.
    pub fn new(graph: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            graph: graph.into(),
            api_token: api_token.into(),
            client: build_client(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Creates an executor from configuration, reading the token from the
    /// environment when the config has none.
    pub fn from_config(config: &ExecutorConfig) -> Result<Self, ExecutorError> {
        let graph = config
            .graph
            .clone()
            .ok_or_else(|| ExecutorError::MissingConfig("executor.graph".to_string()))?;
        let api_token = config.api_token_or_env().ok_or(ExecutorError::MissingToken)?;

        Ok(Self {
            base_url: config.base_url.clone(),
            graph,
            api_token,
            client: build_client(config.timeout_secs),
        })
    }

    /// Sets the API base URL (for proxies or self-hosted peers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// The query endpoint for this graph.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/api/graph/{}/q",
            self.base_url.trim_end_matches('/'),
            self.graph
        )
    }
}

fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    args: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    result: Option<Vec<Row>>,
    message: Option<String>,
}

#[async_trait]
impl QueryExecutor for RoamApiExecutor {
    async fn execute(&self, query: &str) -> Result<Vec<Row>, ExecutorError> {
        let request = QueryRequest {
            query,
            args: Vec::new(),
        };
        let bearer = format!("Bearer {}", self.api_token);

        debug!(endpoint = %self.endpoint(), "Sending query");

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", &bearer)
            .header("x-authorization", &bearer)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(ExecutorError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ExecutorError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| ExecutorError::ParseError(e.to_string()))?;

        match body.result {
            Some(rows) => Ok(rows),
            None => Err(ExecutorError::Rejected(
                body.message.unwrap_or_else(|| "response has no result".to_string()),
            )),
        }
    }

    fn name(&self) -> &str {
        "roam-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let executor = RoamApiExecutor::new("research", "token")
            .with_base_url("https://peer-3.api.roamresearch.com:3001/");
        assert_eq!(
            executor.endpoint(),
            "https://peer-3.api.roamresearch.com:3001/api/graph/research/q"
        );
    }

    #[test]
    fn test_from_config_requires_graph() {
        let config = ExecutorConfig {
            api_token: Some("token".to_string()),
            ..ExecutorConfig::default()
        };
        assert!(matches!(
            RoamApiExecutor::from_config(&config),
            Err(ExecutorError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_response_decoding() {
        let body: QueryResponse =
            serde_json::from_str(r#"{"result": [[{"text": "[[CLM]] - x"}]]}"#).unwrap();
        assert_eq!(body.result.unwrap().len(), 1);

        let body: QueryResponse = serde_json::from_str(r#"{"message": "bad query"}"#).unwrap();
        assert!(body.result.is_none());
        assert_eq!(body.message.as_deref(), Some("bad query"));
    }
}
