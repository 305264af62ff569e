// Async client: direct and streaming search, concurrent batches,
// conversation-handle tracking.

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
use crate::retry::{classify, retry_with_backoff, AttemptError};
use crate::streaming::{decode_fragment_stream, FragmentStream};

/// Asynchronous search client.
///
/// One client shares a connection pool across sequential calls and across a
/// concurrent batch. Plain searches may run concurrently on a shared client;
/// conversation recording is a single-writer operation per conversation
/// handle.
///
/// ```rust,no_run
/// use std::collections::HashMap;
/// use zetesis_client::{AsyncClient, ClientConfig};
/// use zetesis_types::SearchRequest;
///
/// # async fn example() -> zetesis_types::Result<()> {
/// let cookies = HashMap::from([("session".to_string(), "token".to_string())]);
/// let client = AsyncClient::new(ClientConfig::default(), cookies)?;
/// let result = client.search(&SearchRequest::new("What is quantum computing?")).await?;
/// println!("{}", result.answer);
/// # Ok(())
/// # }
/// ```
pub struct AsyncClient {
    http: reqwest::Client,
    config: ClientConfig,
    origin: Url,
    jar: Arc<Jar>,
    cookie_map: Mutex<HashMap<String, String>>,
    conversations: Mutex<ConversationStore>,
}

impl AsyncClient {
    /// Create a client with the given configuration and session cookies.
    pub fn new(config: ClientConfig, cookies: HashMap<String, String>) -> Result<Self> {
        let origin = Url::parse(&config.base_url)
            .map_err(|err| Error::InvalidParameter(format!("invalid base url: {err}")))?;

        let jar = Arc::new(Jar::default());
        for (name, value) in &cookies {
            jar.add_cookie_str(&format!("{name}={value}"), &origin);
        }

        let http = reqwest::Client::builder()
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

    /// Execute a direct search: one structured result, with transient
    /// transport failures retried under exponential backoff.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        request.validate()?;
        let payload = request.payload();
        let url = self.config.search_url();

        tracing::debug!(query = %request.query, mode = %request.mode, "direct search");
        let raw = retry_with_backoff(
            self.config.max_retries,
            self.config.retry_base_delay,
            |_| direct_attempt(&self.http, &url, &payload),
        )
        .await?;

        Ok(SearchResult::from_raw(raw, &request.query))
    }

    /// Execute a streaming search, yielding partial-result fragments as the
    /// service produces them.
    ///
    /// The call uses twice the configured timeout since the connection stays
    /// open for the duration of generation. Dropping the returned stream at
    /// any point closes the connection.
    pub async fn search_stream(&self, request: &SearchRequest) -> Result<FragmentStream> {
        request.validate()?;
        let payload = request.payload();

        tracing::debug!(query = %request.query, mode = %request.mode, "streaming search");
        let response = self
            .http
            .post(self.config.stream_url())
            .json(&payload)
            .timeout(self.config.stream_timeout())
            .send()
            .await
            .map_err(|err| Error::Network(format!("stream request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, body));
        }

        Ok(decode_fragment_stream(response))
    }

    /// Issue a batch of queries as independently scheduled concurrent tasks
    /// over the shared connection pool.
    ///
    /// Results come back in input order regardless of completion order, one
    /// `Result` per slot: a failing query never discards the others'
    /// results.
    pub async fn batch_search(&self, requests: &[SearchRequest]) -> Vec<Result<SearchResult>> {
        futures::future::join_all(requests.iter().map(|request| self.search(request))).await
    }

    /// Create an empty conversation and return its handle.
    pub fn start_conversation(&self) -> ConversationId {
        self.conversations.lock().start()
    }

    /// Execute a follow-up search within a conversation: the conversation's
    /// recent context rides along with the request, and the completed
    /// exchange is recorded afterwards.
    pub async fn search_in(
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
        let result = self.search(&request).await?;

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
}

/// One direct-call attempt: exactly one network round trip.
async fn direct_attempt(
    http: &reqwest::Client,
    url: &str,
    payload: &Value,
) -> std::result::Result<Value, AttemptError> {
    let response = http.post(url).json(payload).send().await.map_err(classify)?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AttemptError::Fatal(status_error(status, body)));
    }

    response.json::<Value>().await.map_err(|err| {
        AttemptError::Fatal(Error::Network(format!(
            "failed to decode response body: {err}"
        )))
    })
}
