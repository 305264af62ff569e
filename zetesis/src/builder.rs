//! High-level builder API for creating clients

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use zetesis_auth::CookieStore;
use zetesis_client::blocking;
use zetesis_client::{AsyncClient, ClientConfig};
use zetesis_types::{Error, Result};

/// High-level builder for creating search clients
///
/// # Example
///
/// ```rust,no_run
/// use zetesis::prelude::*;
///
/// # fn main() -> Result<()> {
/// let client = ClientBuilder::new()
///     .profile("cookies.json", "default")
///     .cookie("extra", "value")
///     .max_retries(5)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    cookies: HashMap<String, String>,
    profile: Option<(PathBuf, String)>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_base_delay: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with default connection settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one session cookie. Explicit cookies override profile cookies of
    /// the same name.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Add a batch of session cookies.
    pub fn cookies(mut self, cookies: HashMap<String, String>) -> Self {
        self.cookies.extend(cookies);
        self
    }

    /// Load cookies from a saved profile in a [`CookieStore`] file.
    pub fn profile(mut self, store_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        self.profile = Some((store_path.into(), name.into()));
        self
    }

    /// Override the service base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Total timeout for a direct call (default: 30 s). Streaming calls use
    /// twice this value.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Maximum attempts for a direct call (default: 3)
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Backoff time unit between retries (default: 1 s)
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Override the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the async client
    ///
    /// # Errors
    ///
    /// Returns an error if a named cookie profile does not exist or the
    /// connection settings are invalid.
    pub fn build(self) -> Result<AsyncClient> {
        let (config, cookies) = self.resolve()?;
        AsyncClient::new(config, cookies)
    }

    /// Build the blocking client
    pub fn build_blocking(self) -> Result<blocking::Client> {
        let (config, cookies) = self.resolve()?;
        blocking::Client::new(config, cookies)
    }

    fn resolve(self) -> Result<(ClientConfig, HashMap<String, String>)> {
        let mut cookies = match &self.profile {
            Some((path, name)) => {
                let store = CookieStore::new(path);
                store.load(name).ok_or_else(|| {
                    Error::InvalidParameter(format!(
                        "cookie profile '{name}' not found in {}",
                        path.display()
                    ))
                })?
            }
            None => HashMap::new(),
        };
        cookies.extend(self.cookies);

        let mut config = ClientConfig::builder();
        if let Some(base_url) = self.base_url {
            config = config.base_url(base_url);
        }
        if let Some(timeout) = self.timeout {
            config = config.timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            config = config.max_retries(max_retries);
        }
        if let Some(delay) = self.retry_base_delay {
            config = config.retry_base_delay(delay);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.user_agent(user_agent);
        }

        Ok((config.build()?, cookies))
    }
}
