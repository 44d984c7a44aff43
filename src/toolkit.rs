use crate::config::AppConfig;
use crate::error::Result;
use crate::tool::ToolRegistry;
use crate::tools::{
    capital_toolkit, page_toolkit, search_toolkit, time_toolkit, LocationTimeResolver,
    PageReader, SearchClient,
};

/// Every built-in tool, wired from `config`.
pub fn agent_toolkit(config: &AppConfig) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.extend(search_toolkit(SearchClient::from_config(&config.search)?));
    registry.extend(time_toolkit(LocationTimeResolver::new()));
    registry.extend(capital_toolkit());
    registry.extend(page_toolkit(PageReader::from_config(&config.page)?));
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registers_all_tools() {
        let registry = agent_toolkit(&AppConfig::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec!["capital_city", "current_time", "fetch_page_text", "web_search"]
        );
        assert!(registry.describe().iter().all(|d| d.parameters.is_some()));
    }

    #[tokio::test]
    async fn unconfigured_search_reports_missing_key() {
        let registry = agent_toolkit(&AppConfig::default()).unwrap();
        let out = registry
            .call("web_search", json!({"query": "rust"}))
            .await
            .unwrap();
        assert_eq!(
            out,
            json!({
                "status": "error",
                "searchResults": [],
                "error": "Serper API key is not configured."
            })
        );
    }
}
