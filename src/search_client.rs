use std::time::Duration;

use futures::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::data_models::{Query, SearchRequest, SearchResponse};

/// Every way a search can fail, classified where it happens. The Display
/// strings are user-facing; the view shows them as-is and never a raw
/// transport error.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Failed to connect to the search server. Please make sure the server is running.")]
    Network(#[source] reqwest::Error),

    #[error("Search is taking longer than expected. Try again or simplify your query.")]
    Timeout,

    /// Non-2xx status. `message` prefers the server-supplied error text,
    /// falling back to the bare status, so Display shows the message alone.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// 2xx but structurally invalid. No server-supplied detail is
    /// trustworthy here, so the message is fixed.
    #[error("Invalid response format from server")]
    Protocol,
}

/// Seam between the controller and the transport, so tests can drive the
/// state machine with a scripted backend.
pub trait SearchBackend: Send + Sync {
    fn search(
        &self,
        query: Query,
        timeout: Duration,
    ) -> BoxFuture<'static, Result<SearchResponse, SearchError>>;
}

#[derive(Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(endpoint: String) -> SearchClient {
        SearchClient {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs the query and races it against the deadline. The deadline
    /// covers connect, response headers and the full body read; when it
    /// elapses the in-flight request future is dropped along with its
    /// timer, and the loser has no further effect.
    pub async fn search(
        &self,
        query: &Query,
        timeout: Duration,
    ) -> Result<SearchResponse, SearchError> {
        log::info!("searching for: {query}");
        match tokio::time::timeout(timeout, self.perform(query)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::warn!("search for {query:?} timed out after {timeout:?}");
                Err(SearchError::Timeout)
            }
        }
    }

    async fn perform(&self, query: &Query) -> Result<SearchResponse, SearchError> {
        let response = self
            .http
            .post(format!("{}/search", self.endpoint))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&SearchRequest {
                query: query.as_str().to_string(),
            })
            .send()
            .await
            .map_err(SearchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|body| Some(body.get("error")?.as_str()?.to_string()))
                .unwrap_or_else(|| format!("HTTP error: {}", status.as_u16()));
            log::error!("search failed with status {status}: {message}");
            return Err(SearchError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(SearchError::Network)?;
        parse_response(&body)
    }
}

/// A 2xx body must be JSON with an array-typed `results`; anything else is
/// a protocol violation, not an empty result set.
pub fn parse_response(body: &str) -> Result<SearchResponse, SearchError> {
    let value: Value = serde_json::from_str(body).map_err(|_| SearchError::Protocol)?;
    if !value.get("results").map(Value::is_array).unwrap_or(false) {
        return Err(SearchError::Protocol);
    }

    let mut response: SearchResponse =
        serde_json::from_value(value).map_err(|_| SearchError::Protocol)?;
    for result in &mut response.results {
        result.ensure_render_key();
    }
    Ok(response)
}

impl SearchBackend for SearchClient {
    fn search(
        &self,
        query: Query,
        timeout: Duration,
    ) -> BoxFuture<'static, Result<SearchResponse, SearchError>> {
        let client = self.clone();
        Box::pin(async move { client.search(&query, timeout).await })
    }
}

#[test]
fn test_parse_response_keeps_order_and_similarity() {
    let body = r#"{
        "results": [
            {"title": "A", "year": 2017, "abstract": "a", "similarity": 0.93, "url": "http://a"},
            {"title": "B", "snippet": "b", "similarity": 0.05},
            {"title": "C", "similarity": 1.0}
        ],
        "key_terms": ["attention"]
    }"#;

    let response = parse_response(body).unwrap();
    let titles: Vec<&str> = response.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    // Similarity stays a fraction, exactly as sent. No inversion, no scaling.
    assert_eq!(response.results[0].similarity, 0.93);
    assert_eq!(response.results[1].similarity, 0.05);
    assert_eq!(response.key_terms, vec!["attention"]);
}

#[test]
fn test_parse_response_fills_render_keys() {
    let body = r#"{"results": [{"title": "A", "paper_id": "p-1"}, {"title": "B"}]}"#;
    let response = parse_response(body).unwrap();
    assert_eq!(response.results[0].render_key(), "p-1");
    assert!(!response.results[1].render_key().is_empty());
}

#[test]
fn test_parse_response_rejects_missing_or_mistyped_results() {
    assert!(matches!(
        parse_response(r#"{"count": 0}"#),
        Err(SearchError::Protocol)
    ));
    assert!(matches!(
        parse_response(r#"{"results": "not-a-list"}"#),
        Err(SearchError::Protocol)
    ));
    assert!(matches!(
        parse_response("<html>oops</html>"),
        Err(SearchError::Protocol)
    ));
}

#[test]
fn test_parse_response_empty_results_is_valid() {
    let response = parse_response(r#"{"results": []}"#).unwrap();
    assert!(response.results.is_empty());
    assert!(response.key_terms.is_empty());
}
