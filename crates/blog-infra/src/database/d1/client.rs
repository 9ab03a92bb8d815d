use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use blog_core::error::RepoError;

/// Credentials and location of a D1 database.
#[derive(Debug, Clone)]
pub struct D1Config {
    pub api_base: String,
    pub account_id: String,
    pub database_id: String,
    pub api_token: String,
}

impl D1Config {
    pub const DEFAULT_API_BASE: &'static str = "https://api.cloudflare.com/client/v4";

    pub fn query_url(&self) -> String {
        format!(
            "{}/accounts/{}/d1/database/{}/query",
            self.api_base.trim_end_matches('/'),
            self.account_id,
            self.database_id
        )
    }
}

/// Executes single SQL statements against D1.
///
/// Split out of the repositories so they can run against a fake in tests.
#[async_trait]
pub trait D1Transport: Send + Sync {
    /// Run one statement with positional `?` parameters and return its rows.
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Value>, RepoError>;
}

/// D1 transport over the Cloudflare REST API.
pub struct D1HttpTransport {
    http: reqwest::Client,
    url: String,
    api_token: String,
}

impl D1HttpTransport {
    pub fn new(config: &D1Config) -> Result<Self, RepoError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("blog-infra/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        Ok(Self {
            http,
            url: config.query_url(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl D1Transport for D1HttpTransport {
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Value>, RepoError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_token)
            .json(&json!({ "sql": sql, "params": params }))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    RepoError::Connection(e.to_string())
                } else {
                    RepoError::Query(e.to_string())
                }
            })?;

        let status = response.status();
        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| RepoError::Query(format!("D1 answered {status} with an unreadable body: {e}")))?;

        body.into_rows()
    }
}

/// Envelope returned by the D1 query endpoint.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    #[serde(default)]
    result: Vec<StatementResult>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    results: Vec<Value>,
}

impl QueryResponse {
    fn into_rows(self) -> Result<Vec<Value>, RepoError> {
        if !self.success {
            let detail = self
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(RepoError::Query(format!("D1 query failed: {detail}")));
        }

        Ok(self
            .result
            .into_iter()
            .next()
            .map(|r| r.results)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        let config = D1Config {
            api_base: "https://api.example.com/client/v4/".into(),
            account_id: "acc".into(),
            database_id: "db".into(),
            api_token: "secret".into(),
        };
        assert_eq!(
            config.query_url(),
            "https://api.example.com/client/v4/accounts/acc/d1/database/db/query"
        );
    }

    #[test]
    fn test_rows_from_successful_response() {
        let body: QueryResponse = serde_json::from_value(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": [{
                "results": [{"count": 3}],
                "success": true,
                "meta": {"changes": 0, "last_row_id": 0}
            }]
        }))
        .unwrap();

        assert_eq!(body.into_rows().unwrap(), vec![json!({"count": 3})]);
    }

    #[test]
    fn test_failed_response_is_query_error() {
        let body: QueryResponse = serde_json::from_value(json!({
            "success": false,
            "errors": [{"code": 7500, "message": "no such table: posts"}],
            "result": []
        }))
        .unwrap();

        let err = body.into_rows().unwrap_err();
        assert!(matches!(err, RepoError::Query(msg) if msg.contains("no such table")));
    }
}
