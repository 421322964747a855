//! GitHub HTTP client
//!
//! Implements [`SearchTransport`] and [`UserLookup`] over reqwest:
//! - Repository search filtered by language, sorted by stars
//! - Optional token authentication
//! - Rate limit header extraction
//! - Failure classification (transport, status, decode)
//!
//! No retries; callers re-issue failed requests themselves.

use super::rate_limit::parse_rate_limit;
use super::transport::{SearchResponse, SearchTransport, UserLookup};
use crate::config::{SearchConfig, MAX_ITEMS_PER_PAGE};
use crate::error::{Error, Result};
use crate::types::{SearchPage, User};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const ACCEPT_JSON: &str = "application/vnd.github+json";

/// HTTP client for the GitHub REST API
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    language: String,
    timeout: Duration,
    authenticated: bool,
}

impl GitHubClient {
    /// Create a client from a search config
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        let token = config.token();
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&authorization_value(token))
                .map_err(|_| Error::invalid_value("auth_token", "not a valid header value"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            language: config.language.clone(),
            timeout: config.timeout(),
            authenticated: token.is_some(),
        })
    }

    /// Whether requests carry an `Authorization` header
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// URL of one search page
    pub fn search_url(&self, page: u32, per_page: u32) -> Result<Url> {
        let mut url = self.endpoint("search/repositories")?;
        url.query_pairs_mut()
            .append_pair("q", &format!("language:{}", self.language))
            .append_pair("sort", "stars")
            .append_pair("order", "desc")
            .append_pair("page", &page.max(1).to_string())
            .append_pair(
                "per_page",
                &per_page.clamp(1, MAX_ITEMS_PER_PAGE).to_string(),
            );
        Ok(url)
    }

    /// Join a path onto the base URL, keeping any base path prefix
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    /// Send a GET and return the response if its status is a success
    async fn get(&self, url: Url) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Request to {} failed with {}", url, status.as_u16());
            return Err(Error::http_status(status.as_u16(), body));
        }
        Ok(response)
    }

    /// Read the body and decode it, reporting schema mismatches as decode errors
    async fn decode_body<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&bytes).map_err(|e| Error::decode(e.to_string()))
    }

    fn classify(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            Error::Http(error)
        }
    }
}

#[async_trait]
impl SearchTransport for GitHubClient {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<SearchResponse> {
        let url = self.search_url(page, per_page)?;
        let response = self.get(url).await?;
        let rate_limit = parse_rate_limit(response.headers());
        let page: SearchPage = self.decode_body(response).await?;

        debug!(
            "Decoded {} items (total {})",
            page.items.len(),
            page.total_count
        );
        Ok(SearchResponse { page, rate_limit })
    }
}

#[async_trait]
impl UserLookup for GitHubClient {
    async fn fetch_user(&self, login: &str) -> Result<User> {
        let mut url = self.endpoint("users")?;
        url.path_segments_mut()
            .map_err(|()| Error::config("base URL cannot carry a path"))?
            .push(login);
        let response = self.get(url).await?;
        self.decode_body(response).await
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

/// A bare token is sent with the `token` scheme; anything that already
/// names a scheme is sent as-is.
fn authorization_value(token: &str) -> String {
    if token.contains(' ') {
        token.to_string()
    } else {
        format!("token {token}")
    }
}
