//! Sequential client: every call blocks the current thread until the
//! exchange, including all retries, completes.
//!
//! Built on `reqwest::blocking`, which must not be used from inside an async
//! runtime; use [`crate::AsyncClient`] there instead.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::cookie::Jar;
use reqwest::Url;
use serde_json::Value;
use zetesis_types::{
    Conversation, ConversationId, ConversationStore, Error, ExportFormat, FollowUpContext, Result,
    SearchRequest, SearchResult, DEFAULT_CONTEXT_MESSAGES,
};

use crate::config::ClientConfig;
use crate::response::status_error;
use crate::retry::{classify, retry_with_backoff_blocking, AttemptError};
use crate::streaming::Fragments;

/// Blocking search client.
///
/// ```rust,no_run
/// use std::collections::HashMap;
/// use zetesis_client::blocking::Client;
/// use zetesis_client::ClientConfig;
/// use zetesis_types::SearchRequest;
///
/// # fn example() -> zetesis_types::Result<()> {
/// let cookies = HashMap::from([("session".to_string(), "token".to_string())]);
/// let client = Client::new(ClientConfig::default(), cookies)?;
/// let result = client.search(&SearchRequest::new("What is quantum computing?"))?;
/// println!("{}", result.answer);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    origin: Url,
    jar: Arc<Jar>,
    cookie_map: Mutex<HashMap<String, String>>,
    conversations: Mutex<ConversationStore>,
}

impl Client {
    /// Create a client with the given configuration and session cookies.
    pub fn new(config: ClientConfig, cookies: HashMap<String, String>) -> Result<Self> {
        let origin = Url::parse(&config.base_url)
            .map_err(|err| Error::InvalidParameter(format!("invalid base url: {err}")))?;

        let jar = Arc::new(Jar::default());
        for (name, value) in &cookies {
            jar.add_cookie_str(&format!("{name}={value}"), &origin);
        }

        let http = reqwest::blocking::Client::builder()
            .default_headers(config.default_headers()?)
            .cookie_provider(Arc::clone(&jar))
            .timeout(config.timeout)
            .build()
            .map_err(|err| Error::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            config,
            origin,
            jar,
            cookie_map: Mutex::new(cookies),
            conversations: Mutex::new(ConversationStore::new()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cookies installed on this client (not including any later set by the
    /// service).
    pub fn cookies(&self) -> HashMap<String, String> {
        self.cookie_map.lock().clone()
    }

    /// Install additional session cookies; existing names are replaced.
    pub fn set_cookies(&self, cookies: HashMap<String, String>) {
        for (name, value) in &cookies {
            self.jar
                .add_cookie_str(&format!("{name}={value}"), &self.origin);
        }
        self.cookie_map.lock().extend(cookies);
    }

    /// Execute a direct search, blocking through retries until the exchange
    /// completes.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        request.validate()?;
        let payload = request.payload();
        let url = self.config.search_url();

        tracing::debug!(query = %request.query, mode = %request.mode, "direct search");
        let raw = retry_with_backoff_blocking(
            self.config.max_retries,
            self.config.retry_base_delay,
            |_| self.direct_attempt(&url, &payload),
        )?;

        Ok(SearchResult::from_raw(raw, &request.query))
    }

    /// Execute a streaming search, returning an iterator of partial-result
    /// fragments. Dropping the iterator closes the connection.
    pub fn search_stream(
        &self,
        request: &SearchRequest,
    ) -> Result<Fragments<reqwest::blocking::Response>> {
        request.validate()?;
        let payload = request.payload();

        tracing::debug!(query = %request.query, mode = %request.mode, "streaming search");
        let response = self
            .http
            .post(self.config.stream_url())
            .json(&payload)
            .timeout(self.config.stream_timeout())
            .send()
            .map_err(|err| Error::Network(format!("stream request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(status_error(status, body));
        }

        Ok(Fragments::new(response))
    }

    /// Create an empty conversation and return its handle.
    pub fn start_conversation(&self) -> ConversationId {
        self.conversations.lock().start()
    }

    /// Execute a follow-up search within a conversation; see
    /// [`crate::AsyncClient::search_in`].
    pub fn search_in(
        &self,
        conversation: &ConversationId,
        request: &SearchRequest,
    ) -> Result<SearchResult> {
        let follow_up = {
            let store = self.conversations.lock();
            let conv = store.get(conversation).ok_or_else(|| {
                Error::InvalidParameter(format!("unknown conversation: {conversation}"))
            })?;
            FollowUpContext {
                conversation_id: conversation.to_string(),
                context: conv.context(DEFAULT_CONTEXT_MESSAGES),
            }
        };

        let request = request.clone().follow_up(follow_up);
        let result = self.search(&request)?;

        let mut store = self.conversations.lock();
        if let Some(conv) = store.get_mut(conversation) {
            conv.add_exchange(&request.query, &result.answer, &result.sources);
        }
        Ok(result)
    }

    /// Snapshot of a conversation, if it exists.
    pub fn conversation(&self, id: &ConversationId) -> Option<Conversation> {
        self.conversations.lock().get(id).cloned()
    }

    /// Render a conversation in the requested format.
    pub fn export_conversation(&self, id: &ConversationId, format: ExportFormat) -> Result<String> {
        let store = self.conversations.lock();
        let conv = store
            .get(id)
            .ok_or_else(|| Error::InvalidParameter(format!("unknown conversation: {id}")))?;
        conv.export(format)
    }

    /// Drop a conversation. Returns whether it existed.
    pub fn end_conversation(&self, id: &ConversationId) -> bool {
        self.conversations.lock().remove(id)
    }

    /// One direct-call attempt: exactly one network round trip.
    fn direct_attempt(
        &self,
        url: &str,
        payload: &Value,
    ) -> std::result::Result<Value, AttemptError> {
        let response = self
            .http
            .post(url)
            .json(payload)
            .send()
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AttemptError::Fatal(status_error(status, body)));
        }

        response.json::<Value>().map_err(|err| {
            AttemptError::Fatal(Error::Network(format!(
                "failed to decode response body: {err}"
            )))
        })
    }
}
