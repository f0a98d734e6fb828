use thiserror::Error;

/// Client-side error type shared by the REST client and every controller.
///
/// Transport and server failures are carried through unchanged; callers decide
/// what, if anything, to show. A missing entity is *not* an error: `find`
/// reports it as an empty response body.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Entity has no identifier")]
    MissingIdentifier,

    #[error("A request is already in flight for this form")]
    InFlight,
}

impl ClientError {
    /// HTTP status reported by the server, if the failure came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
