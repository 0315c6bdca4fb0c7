//! Google Custom Search JSON API client
//!
//! This module provides the transport used by the engine: one HTTP GET per
//! query string against the Custom Search endpoint, carrying the API key,
//! the search engine id, a 1-based start offset and the URL-encoded query.
//!
//! The provider reports failures as a JSON `error` object, often with a
//! non-200 status. A message mentioning "quota" is mapped to
//! [`Error::QuotaExceeded`] so the engine can retire the key.
//!
//! # Example
//!
//! ```no_run
//! use banshee_core::google::{CustomSearchClient, SearchTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CustomSearchClient::new()?;
//! let response = client.search("AIza...", 1, "site:example.com ext:pdf").await?;
//! println!("Links: {:?}", response.links());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Proxy, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Custom Search JSON API endpoint
pub const CUSTOM_SEARCH_API: &str = "https://www.googleapis.com/customsearch/v1";
/// Programmable search engine id
pub const SEARCH_ENGINE_ID: &str = "759aed2f7b4be4b83";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";
const CONNECT_TIMEOUT_SECS: u64 = 20;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const POOL_IDLE_TIMEOUT_SECS: u64 = 60;
const TCP_KEEPALIVE_SECS: u64 = 30;

/// Something that can run one search request
///
/// The engine only talks to the provider through this trait.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Runs `query` with `key`, starting at the 1-based result `start`
    ///
    /// # Errors
    ///
    /// [`Error::QuotaExceeded`] when the key is out of quota, any other
    /// error for network, decoding or provider failures
    async fn search(&self, key: &str, start: u32, query: &str) -> Result<SearchResponse>;
}

/// A single result item
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchItem {
    #[serde(default)]
    pub link: String,
}

/// Error object returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    /// Determines if this error means the key's quota is used up
    pub fn is_quota(&self) -> bool {
        self.message.to_lowercase().contains("quota")
    }

    fn into_error(self) -> Error {
        if self.is_quota() {
            Error::QuotaExceeded(self.message)
        } else {
            Error::SearchApi(self.message)
        }
    }
}

/// Response body from the Custom Search API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    /// Result items, absent when nothing matched
    #[serde(default)]
    pub items: Vec<SearchItem>,

    /// Error object, present on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl SearchResponse {
    /// Builds a successful response from plain links
    pub fn from_links<I, S>(links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: links
                .into_iter()
                .map(|l| SearchItem { link: l.into() })
                .collect(),
            error: None,
        }
    }

    /// Links of all result items
    pub fn links(&self) -> Vec<String> {
        self.items.iter().map(|i| i.link.clone()).collect()
    }
}

/// Parses a response body, mapping provider error objects to errors
///
/// # Errors
///
/// [`Error::Json`] for non-JSON bodies, [`Error::QuotaExceeded`] or
/// [`Error::SearchApi`] for error objects
///
/// # Examples
///
/// ```
/// use banshee_core::google::parse_response;
///
/// let body = r#"{"items":[{"link":"https://example.com/a.pdf"}]}"#;
/// let response = parse_response(body).unwrap();
/// assert_eq!(response.links(), vec!["https://example.com/a.pdf"]);
///
/// let quota = r#"{"error":{"code":429,"message":"Quota exceeded for quota metric"}}"#;
/// assert!(parse_response(quota).unwrap_err().is_quota());
/// ```
pub fn parse_response(body: &str) -> Result<SearchResponse> {
    let mut response: SearchResponse = serde_json::from_str(body)?;
    match response.error.take() {
        Some(err) if !err.message.is_empty() => Err(err.into_error()),
        _ => Ok(response),
    }
}

/// Client for the Custom Search JSON API
#[derive(Debug, Clone)]
pub struct CustomSearchClient {
    client: Client,
    endpoint: String,
    engine_id: String,
}

impl CustomSearchClient {
    /// Creates a client with default timeouts and no proxy
    ///
    /// # Examples
    ///
    /// ```
    /// use banshee_core::google::CustomSearchClient;
    ///
    /// let client = CustomSearchClient::new()?;
    /// # Ok::<(), banshee_core::error::Error>(())
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_proxy(None)
    }

    /// Creates a client that routes every request through `proxy`
    ///
    /// The proxy is given as `[protocol://]host[:port]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProxy`] if the proxy URL is malformed
    pub fn with_proxy(proxy: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let mut builder = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
            .tcp_keepalive(Duration::from_secs(TCP_KEEPALIVE_SECS));

        if let Some(proxy) = proxy.map(str::trim).filter(|p| !p.is_empty()) {
            let proxy = Proxy::all(proxy).map_err(|e| Error::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: CUSTOM_SEARCH_API.to_string(),
            engine_id: SEARCH_ENGINE_ID.to_string(),
        })
    }

    /// Points the client at another endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Uses another programmable search engine id
    pub fn with_engine_id(mut self, engine_id: impl Into<String>) -> Self {
        self.engine_id = engine_id.into();
        self
    }

    /// Full request URL for one query
    pub fn request_url(&self, key: &str, start: u32, query: &str) -> String {
        format!(
            "{}?key={}&cx={}&start={}&q={}",
            self.endpoint,
            urlencoding::encode(key),
            urlencoding::encode(&self.engine_id),
            start,
            urlencoding::encode(query.trim())
        )
    }
}

#[async_trait]
impl SearchTransport for CustomSearchClient {
    async fn search(&self, key: &str, start: u32, query: &str) -> Result<SearchResponse> {
        let url = self.request_url(key, start, query);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match parse_response(&body) {
            Ok(parsed) => Ok(parsed),
            Err(Error::Json(e)) if status != StatusCode::OK => Err(Error::SearchApi(format!(
                "API request failed with status {}: {}",
                status, e
            ))),
            Err(e) => Err(e),
        }
    }
}
