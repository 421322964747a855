//! Search configuration
//!
//! Everything the transport and the fetch controller need to know is carried
//! in an explicit [`SearchConfig`] passed at construction time. It can be
//! built in code or loaded from YAML; every field has a default.

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound the API accepts for `per_page`
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

/// Only the first 1000 search results are reachable through the API
pub const DEFAULT_MAX_SEARCH_LIMIT: u64 = 1000;

/// Configuration for a repository search feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// API root, e.g. `https://api.github.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Language filter for the search predicate
    #[serde(default = "default_language")]
    pub language: String,

    /// Requested page size
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,

    /// Ceiling applied to the server-reported total
    #[serde(default = "default_max_search_limit")]
    pub max_search_limit: u64,

    /// Optional token sent as the `Authorization` header
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent string (the API rejects requests without one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_language() -> String {
    "swift".to_string()
}

fn default_items_per_page() -> u32 {
    MAX_ITEMS_PER_PAGE
}

fn default_max_search_limit() -> u64 {
    DEFAULT_MAX_SEARCH_LIMIT
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("superstars/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            items_per_page: default_items_per_page(),
            max_search_limit: default_max_search_limit(),
            auth_token: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl SearchConfig {
    /// Create a new config builder
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }

    /// Check that the config can drive requests
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;

        if self.language.trim().is_empty() {
            return Err(Error::invalid_value("language", "must not be empty"));
        }
        if self.max_search_limit == 0 {
            return Err(Error::invalid_value(
                "max_search_limit",
                "must be greater than zero",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::invalid_value("user_agent", "must not be empty"));
        }
        Ok(())
    }

    /// Page size actually requested, clamped into `1..=100`
    pub fn effective_items_per_page(&self) -> u32 {
        self.items_per_page.clamp(1, MAX_ITEMS_PER_PAGE)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token, ignoring blank values
    pub fn token(&self) -> Option<&str> {
        self.auth_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Builder for [`SearchConfig`]
#[derive(Debug, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Set the API root
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the language filter
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.config.language = language.into();
        self
    }

    /// Set the page size
    #[must_use]
    pub fn items_per_page(mut self, items: u32) -> Self {
        self.config.items_per_page = items;
        self
    }

    /// Set the ceiling on the reported total
    #[must_use]
    pub fn max_search_limit(mut self, limit: u64) -> Self {
        self.config.max_search_limit = limit;
        self
    }

    /// Set the auth token
    #[must_use]
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Set the user agent
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> SearchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_case::test_case;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.base_url, "https://api.github.com");
        assert_eq!(config.language, "swift");
        assert_eq!(config.items_per_page, 100);
        assert_eq!(config.max_search_limit, 1000);
        assert!(config.auth_token.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("superstars/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SearchConfig::builder()
            .base_url("http://localhost:8080")
            .language("rust")
            .items_per_page(10)
            .max_search_limit(50)
            .auth_token("token abc")
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent/1.0")
            .build();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.language, "rust");
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.max_search_limit, 50);
        assert_eq!(config.token(), Some("token abc"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test_case(0 => 1 ; "zero is raised to one")]
    #[test_case(1 => 1 ; "lower bound")]
    #[test_case(68 => 68 ; "in range")]
    #[test_case(100 => 100 ; "upper bound")]
    #[test_case(250 => 100 ; "above the api maximum")]
    fn test_effective_items_per_page(requested: u32) -> u32 {
        SearchConfig::builder()
            .items_per_page(requested)
            .build()
            .effective_items_per_page()
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = SearchConfig::builder().auth_token("   ").build();
        assert!(config.token().is_none());
    }

    #[test]
    fn test_from_yaml_str_uses_defaults() {
        let config = SearchConfig::from_yaml_str("language: rust\nitems_per_page: 30\n").unwrap();
        assert_eq!(config.language, "rust");
        assert_eq!(config.items_per_page, 30);
        assert_eq!(config.max_search_limit, 1000);
        assert_eq!(config.base_url, "https://api.github.com");
    }

    #[test]
    fn test_from_yaml_str_rejects_invalid() {
        let err = SearchConfig::from_yaml_str("language: ''\n").unwrap_err();
        assert!(err.to_string().contains("language"));

        let err = SearchConfig::from_yaml_str("base_url: not a url\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = SearchConfig::from_yaml_str("max_search_limit: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_search_limit"));

        let err = SearchConfig::from_yaml_str("items_per_page: [1]\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language: kotlin").unwrap();
        writeln!(file, "auth_token: token xyz").unwrap();

        let config = SearchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.language, "kotlin");
        assert_eq!(config.token(), Some("token xyz"));
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SearchConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
