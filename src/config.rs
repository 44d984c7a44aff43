use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolError};

pub const DEFAULT_SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_num_results")]
    pub default_num_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            default_num_results: default_num_results(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_SERPER_ENDPOINT.into()
}

fn default_num_results() -> usize {
    10
}

impl SearchConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The configured key, or an empty string when unset.
    pub fn api_key_or_empty(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }

    /// Loggable form of the key: first four and last two characters only.
    /// `None` when no key is configured.
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key_or_empty();
        if key.trim().is_empty() {
            return None;
        }
        let chars: Vec<char> = key.chars().collect();
        if chars.len() > 4 {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
            Some(format!("{head}...{tail}"))
        } else {
            Some("***".into())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageConfig {
    #[serde(default = "default_page_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_page_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_page_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; AgentTools/0.1)".into()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&raw)
            .map_err(|err| ToolError::Config(format!("Failed to parse configuration: {err}")))?;
        Ok(cfg)
    }

    /// Defaults overlaid with process environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_overrides(|key| env::var(key).ok());
        cfg
    }

    pub fn from_env_or_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut cfg = Self::from_file(path)?;
        cfg.apply_overrides(|key| env::var(key).ok());
        Ok(cfg)
    }

    /// Apply `SERPER_*` / `AGENT_TOOLS_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("SERPER_API_KEY") {
            self.search.api_key = Some(key);
        }
        if let Some(endpoint) = lookup("SERPER_ENDPOINT") {
            self.search.endpoint = endpoint;
        }
        if let Some(timeout) = lookup("AGENT_TOOLS_PAGE_TIMEOUT_SECS") {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.page.timeout_secs = parsed;
            }
        }
        if let Some(level) = lookup("AGENT_TOOLS_LOG") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("AGENT_TOOLS_LOG_JSON") {
            if let Ok(parsed) = json.parse::<bool>() {
                self.logging.json = parsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_and_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[search]\napi_key='from-file'\ndefault_num_results=5\n[logging]\nlevel='debug'"
        )
        .unwrap();

        let mut cfg = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(cfg.search.api_key.as_deref(), Some("from-file"));
        assert_eq!(cfg.search.endpoint, DEFAULT_SERPER_ENDPOINT);
        assert_eq!(cfg.search.default_num_results, 5);
        assert_eq!(cfg.page.timeout_secs, 30);

        let env: HashMap<&str, &str> = HashMap::from([
            ("SERPER_API_KEY", "from-env"),
            ("AGENT_TOOLS_PAGE_TIMEOUT_SECS", "7"),
            ("AGENT_TOOLS_LOG_JSON", "true"),
        ]);
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(cfg.search.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.page.timeout_secs, 7);
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);
    }

    #[test]
    fn ignores_unparseable_overrides() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|key| match key {
            "AGENT_TOOLS_PAGE_TIMEOUT_SECS" => Some("soon".into()),
            "AGENT_TOOLS_LOG_JSON" => Some("maybe".into()),
            _ => None,
        });
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn rejects_malformed_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[search\napi_key=").unwrap();
        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ToolError::Config(_)));
    }

    #[test]
    fn masks_api_keys() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.masked_api_key(), None);
        assert_eq!(cfg.clone().with_api_key("   ").masked_api_key(), None);
        assert_eq!(
            cfg.clone().with_api_key("abcd1234xy").masked_api_key().as_deref(),
            Some("abcd...xy")
        );
        assert_eq!(
            cfg.with_api_key("abcd").masked_api_key().as_deref(),
            Some("***")
        );
    }
}
