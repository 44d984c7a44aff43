//! Serper web search toolkit.
//!
//! Wraps the Serper Google search API. Searches never fail from the caller's
//! point of view: a missing API key, a transport error or an unreadable body
//! all come back as a [`SearchResponse`] with an error status.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::config::SearchConfig;
use crate::error::{Result, ToolError};
use crate::report::Status;
use crate::tool::{Tool, ToolRegistry};

pub const MISSING_API_KEY: &str = "Serper API key is not configured.";

/// One organic search hit, in provider order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// Outcome of a search. An error response never carries results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    status: Status,
    #[serde(rename = "searchResults")]
    results: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SearchResponse {
    pub fn success(results: Vec<SearchResult>) -> Self {
        Self {
            status: Status::Success,
            results,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            results: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<SearchResult> {
        self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Human-readable listing of the response.
    pub fn render(&self) -> String {
        if self.status == Status::Error {
            return format!(
                "Error: {}",
                self.error
                    .as_deref()
                    .unwrap_or("Unknown error occurred during search")
            );
        }
        if self.results.is_empty() {
            return "No results found for your search.".to_string();
        }

        let mut out = String::from("Here are the search results:\n\n");
        for (index, result) in self.results.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, result.title));
            out.push_str(&format!("   URL: {}\n", result.link));
            out.push_str(&format!("   {}\n", result.snippet));
            out.push_str(&"-".repeat(50));
            out.push_str("\n\n");
        }
        out
    }
}

/// HTTP seam for the search client.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// POST `body` as JSON to `url`, authenticated with `api_key`, and return the raw body.
    async fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<String>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl SearchTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, api_key: &str, body: &Value) -> Result<String> {
        let response = self
            .http
            .post(url)
            .header("X-API-KEY", api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Client for the Serper search endpoint.
#[derive(Clone)]
pub struct SearchClient {
    api_key: String,
    endpoint: String,
    default_num_results: usize,
    transport: Arc<dyn SearchTransport>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("default_num_results", &self.default_num_results)
            .finish_non_exhaustive()
    }
}

impl SearchClient {
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(ReqwestTransport::new()?)))
    }

    pub fn with_transport(config: &SearchConfig, transport: Arc<dyn SearchTransport>) -> Self {
        match config.masked_api_key() {
            Some(masked) => info!(api_key = %masked, "search client initialized"),
            None => warn!("search client initialized with blank API key; searches will fail"),
        }
        Self {
            api_key: config.api_key_or_empty().to_string(),
            endpoint: config.endpoint.clone(),
            default_num_results: config.default_num_results,
            transport,
        }
    }

    /// Search with the configured default result count.
    pub async fn search(&self, query: &str) -> SearchResponse {
        self.search_with_limit(query, self.default_num_results).await
    }

    pub async fn search_with_limit(&self, query: &str, num_results: usize) -> SearchResponse {
        if self.api_key.trim().is_empty() {
            return SearchResponse::failure(MISSING_API_KEY);
        }

        debug!(query, num_results, "performing search");
        let body = json!({ "q": query, "num": num_results });
        let parsed = match self
            .transport
            .post_json(&self.endpoint, &self.api_key, &body)
            .await
        {
            Ok(raw) => {
                debug!("search request successful, processing results");
                parse_search_results(&raw, num_results)
            }
            Err(err) => Err(err),
        };

        match parsed {
            Ok(results) => SearchResponse::success(results),
            Err(err) => {
                error!(error = %err, "error performing search with Serper API");
                SearchResponse::failure(format!("Error performing search: {err}"))
            }
        }
    }
}

/// Extract up to `max_results` entries of the `organic` array.
///
/// Missing fields become empty strings; an absent `organic` array yields no results.
pub fn parse_search_results(body: &str, max_results: usize) -> Result<Vec<SearchResult>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let json: Value = serde_json::from_str(body)?;
    let organic = match json.get("organic").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return Ok(Vec::new()),
    };

    Ok(organic
        .iter()
        .take(max_results)
        .map(|entry| SearchResult {
            title: text_field(entry, "title"),
            link: text_field(entry, "link"),
            snippet: text_field(entry, "snippet"),
        })
        .collect())
}

fn text_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Create a search toolkit exposing `web_search`.
pub fn search_toolkit(client: SearchClient) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WebSearchTool { client });
    registry
}

struct WebSearchTool {
    client: SearchClient,
}

#[derive(Debug, Deserialize)]
struct WebSearchInput {
    query: String,
    #[serde(default)]
    num_results: Option<usize>,
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web using Serper. Expects {\"query\": string, \"num_results\": number (optional)}."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query"},
                "num_results": {"type": "integer", "description": "Maximum number of results", "default": 10}
            },
            "required": ["query"]
        }))
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let req: WebSearchInput = serde_json::from_value(input)
            .map_err(|e| ToolError::Protocol(format!("Invalid web_search input: {e}")))?;

        let response = match req.num_results {
            Some(n) => self.client.search_with_limit(&req.query, n).await,
            None => self.client.search(&req.query).await,
        };
        Ok(serde_json::to_value(response)?)
    }
}
