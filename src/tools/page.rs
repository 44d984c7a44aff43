//! Web page reader.
//!
//! Fetches a page and reduces its HTML to the visible text so it can be
//! summarized by a model.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::config::PageConfig;
use crate::error::{Result, ToolError};
use crate::tool::{Tool, ToolRegistry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

#[derive(Clone)]
pub struct PageReader {
    http: reqwest::Client,
}

impl PageReader {
    pub fn from_config(config: &PageConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { http })
    }

    pub async fn fetch_text(&self, url: &str) -> Result<PageText> {
        debug!(url, "fetching page");
        let html = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(PageText {
            url: url.to_string(),
            title: extract_title(&html),
            text: html_to_text(&html),
        })
    }
}

fn hidden_blocks() -> &'static Regex {
    static HIDDEN: OnceLock<Regex> = OnceLock::new();
    HIDDEN.get_or_init(|| {
        Regex::new(
            r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<!--.*?-->",
        )
        .expect("valid hidden block pattern")
    })
}

fn tags() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag pattern"))
}

fn title_pattern() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("valid title pattern")
    })
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Visible text of an HTML document, whitespace collapsed.
pub fn html_to_text(html: &str) -> String {
    let visible = hidden_blocks().replace_all(html, " ");
    let untagged = tags().replace_all(&visible, " ");
    let decoded = html_decode(&untagged);
    whitespace().replace_all(&decoded, " ").trim().to_string()
}

pub fn extract_title(html: &str) -> Option<String> {
    title_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            whitespace()
                .replace_all(&html_decode(m.as_str()), " ")
                .trim()
                .to_string()
        })
        .filter(|title| !title.is_empty())
}

fn html_decode(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

/// Create a toolkit exposing `fetch_page_text`.
pub fn page_toolkit(reader: PageReader) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(FetchPageTextTool { reader });
    registry
}

struct FetchPageTextTool {
    reader: PageReader,
}

#[async_trait]
impl Tool for FetchPageTextTool {
    fn name(&self) -> &str {
        "fetch_page_text"
    }

    fn description(&self) -> &str {
        "Download a web page and return its visible text. Expects {\"url\": string}."
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "Absolute http(s) URL"}
            },
            "required": ["url"]
        }))
    }

    async fn call(&self, input: Value) -> Result<Value> {
        let url = input
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::Protocol("missing `url` for fetch_page_text".into()))?;

        let page = self.reader.fetch_text(url).await?;
        Ok(serde_json::to_value(page)?)
    }
}
