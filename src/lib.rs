//! Leaf utilities for goal-directed agents.
//!
//! The crate provides:
//! - A Serper web search client (`SearchClient`) that reports failures as data.
//! - A city-name to local-time resolver (`LocationTimeResolver`).
//! - A capital city lookup and a web page text reader.
//! - A simple tool interface (`Tool` and `ToolRegistry`) exposing all of the above.

mod config;
mod error;
mod report;
mod telemetry;
mod tool;
mod toolkit;
pub mod tools;

pub use config::{AppConfig, LoggingConfig, PageConfig, SearchConfig, DEFAULT_SERPER_ENDPOINT};
pub use error::{Result, ToolError};
pub use report::{CapitalResult, Status, TimeResult, ToolReport};
pub use telemetry::init_tracing;
pub use tool::{Tool, ToolDescription, ToolRegistry};
pub use toolkit::agent_toolkit;
pub use tools::{
    capital_city, LocationTimeResolver, PageReader, SearchClient, SearchResponse, SearchResult,
    SearchTransport,
};
