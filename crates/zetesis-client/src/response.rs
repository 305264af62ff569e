// Status-code mapping shared by the direct and streaming paths of both
// clients.

use reqwest::StatusCode;
use zetesis_types::Error;

/// Map a non-success response to the error taxonomy.
///
/// 401 and 429 are authentication and throttling signals the caller must
/// handle; 400 echoes the body so the rejected parameter is visible;
/// anything else is a generic service error with full diagnostics.
pub(crate) fn status_error(status: StatusCode, body: String) -> Error {
    match status {
        StatusCode::UNAUTHORIZED => {
            Error::Authentication("authentication failed - invalid cookies".to_string())
        }
        StatusCode::TOO_MANY_REQUESTS => {
            Error::RateLimit("rate limit exceeded - too many requests".to_string())
        }
        StatusCode::BAD_REQUEST => Error::InvalidParameter(format!("invalid request: {body}")),
        other => Error::Service {
            status: other.as_u16(),
            body,
        },
    }
}
