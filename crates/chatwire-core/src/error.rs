//! Unified error type exposed by **`chatwire-core`**.
//!
//! Backend crates should convert their internal errors into one of these
//! variants before bubbling them up to the relay or a chat session. This
//! keeps the public API small while still conveying rich diagnostic
//! information – in particular the distinction the HTTP layer relies on:
//! a configuration problem (no upstream call attempted), a transport
//! failure (the call never completed), a non-success upstream status, and
//! an upstream payload of unexpected shape.

use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Debug, Error)]
pub enum RelayError {
    /// A required credential or endpoint setting is absent. Surfaced before
    /// any network traffic happens.
    #[error("missing configuration: {0}")]
    Configuration(String),

    /// The incoming request body was malformed or incomplete.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The upstream endpoint could not be reached, or reading its response
    /// stream failed mid-flight.
    #[error("upstream transport failed: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The upstream endpoint answered with a non-success HTTP status. The
    /// raw body is carried along verbatim for diagnostics.
    #[error("upstream returned non-success status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// The upstream endpoint answered 2xx but the payload did not have the
    /// expected shape (missing field, non-JSON body).
    #[error("unexpected upstream payload: {0}")]
    UpstreamFormat(String),

    /// Failure while serialising or deserialising JSON payloads sent to /
    /// received from the upstream endpoint.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RelayError {
    /// Wrap an arbitrary transport-level failure.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RelayError::Transport(Box::new(err))
    }
}
