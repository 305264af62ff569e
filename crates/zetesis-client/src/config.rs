// Client configuration and shared HTTP plumbing.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER};
use zetesis_types::{Error, Result};

pub(crate) const DEFAULT_BASE_URL: &str = "https://www.perplexity.ai";
pub(crate) const SEARCH_PATH: &str = "/api/search";
pub(crate) const STREAM_PATH: &str = "/api/search/stream";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Connection settings shared by the async and blocking clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Total timeout for a direct call. Streaming calls use twice this value
    /// since they stay open for the duration of generation.
    pub timeout: Duration,
    /// Maximum attempts for a direct call (first try included).
    pub max_retries: u32,
    /// One backoff "time unit": attempt n sleeps `retry_base_delay * 2^n`.
    pub retry_base_delay: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    pub(crate) fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }

    pub(crate) fn stream_url(&self) -> String {
        format!("{}{}", self.base_url, STREAM_PATH)
    }

    pub(crate) fn stream_timeout(&self) -> Duration {
        self.timeout * 2
    }

    /// Browser-plausible headers the service expects on every request.
    pub(crate) fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|_| Error::InvalidParameter("user agent contains invalid characters".to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(&self.base_url)
                .map_err(|_| Error::InvalidParameter("base url contains invalid characters".to_string()))?,
        );
        headers.insert(
            REFERER,
            HeaderValue::from_str(&format!("{}/", self.base_url))
                .map_err(|_| Error::InvalidParameter("base url contains invalid characters".to_string()))?,
        );
        headers.insert("Sec-Fetch-Dest", HeaderValue::from_static("empty"));
        headers.insert("Sec-Fetch-Mode", HeaderValue::from_static("cors"));
        headers.insert("Sec-Fetch-Site", HeaderValue::from_static("same-origin"));
        Ok(headers)
    }
}

/// Builder with validation for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let defaults = ClientConfig::default();

        let base_url = self.base_url.unwrap_or(defaults.base_url);
        let base_url = base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::InvalidParameter(
                "base url must not be empty".to_string(),
            ));
        }

        let max_retries = self.max_retries.unwrap_or(defaults.max_retries);
        if max_retries == 0 {
            return Err(Error::InvalidParameter(
                "max retries must be at least 1".to_string(),
            ));
        }

        let timeout = self.timeout.unwrap_or(defaults.timeout);
        if timeout.is_zero() {
            return Err(Error::InvalidParameter(
                "timeout must be non-zero".to_string(),
            ));
        }

        Ok(ClientConfig {
            base_url,
            timeout,
            max_retries,
            retry_base_delay: self.retry_base_delay.unwrap_or(defaults.retry_base_delay),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        })
    }
}
