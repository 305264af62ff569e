use thiserror::Error;

/// Error taxonomy for the Zetesis client.
///
/// Callers are expected to branch on the variant: `Authentication` means the
/// cookies need refreshing, `RateLimit` means back off before trying again,
/// `InvalidParameter` means the request itself is wrong and retrying is
/// pointless.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-supplied configuration violates a static rule (empty query,
    /// incompatible mode/model pairing). Raised before any network activity.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The service rejected the session cookies (HTTP 401).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The service is throttling this session (HTTP 429).
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Transport-level failure (timeout, connection refused) or an exhausted
    /// retry budget. The message carries the underlying cause.
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success response from the service.
    #[error("service error ({status}): {body}")]
    Service { status: u16, body: String },

    /// No cookie-extraction backend is available for the requested browser.
    #[error("cookie extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
