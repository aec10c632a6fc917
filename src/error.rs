use thiserror::Error;

/// Errors raised by a session provider while acquiring a token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No authenticated session exists
    #[error("No active session")]
    NoSession,

    /// The provider produced a value that cannot be used as a token
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The provider itself failed (unreadable token store, identity service down, ...)
    #[error("Session provider failed: {0}")]
    Provider(String),
}

/// Errors from performing the HTTP exchange
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The backend answered with a non-2xx status
    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be handed to the HTTP client
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// HTTP status code, if the backend responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors decoding a response body
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// Body is not valid JSON
    #[error("Invalid JSON response: {0}")]
    Json(String),

    /// The response decoded to a different kind of payload than the caller asked for
    #[error("Unexpected payload: expected {expected}, got {actual}")]
    UnexpectedPayload {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Top-level error returned by every domain operation.
///
/// Nothing inside the client recovers from these; they surface to the caller
/// exactly as produced.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Token acquisition failed; no request was dispatched
    #[error("Not authenticated: {0}")]
    NotAuthenticated(#[from] SessionError),

    /// HTTP exchange failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Response body did not match the expected response type
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// A file selected for upload could not be read
    #[error("Failed to read file '{name}': {message}")]
    ReadFailed { name: String, message: String },

    /// The request could not be assembled (bad URL, unserializable body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Whether this error came from the session provider.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, ClientError::NotAuthenticated(_))
    }
}
