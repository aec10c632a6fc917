//! Session provider abstraction.
//!
//! The client never authenticates on its own. Every outbound request asks a
//! [`SessionProvider`] for a token, and the provider owns whatever refresh or
//! validation that involves.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │    AuthenticatedTransport    │
//! └──────────────┬───────────────┘
//!                │ acquire_token() (once per request)
//!                ▼
//! ┌──────────────────────────────┐
//! │     SessionProvider trait    │
//! └──────────────┬───────────────┘
//!        ┌───────┴────────┐
//!        ▼                ▼
//! ┌──────────────┐ ┌──────────────────┐
//! │ StaticToken  │ │ TokenFile        │
//! │ Provider     │ │ Provider         │
//! └──────────────┘ └──────────────────┘
//! ```

mod providers;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SessionError;

pub use providers::{StaticTokenProvider, TokenFileProvider};

// =============================================================================
// Token
// =============================================================================

/// An opaque access token.
///
/// The value is forwarded verbatim and never inspected. `Debug` is redacted so
/// tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token value.
    ///
    /// Rejects empty values and values that cannot be carried in an HTTP
    /// header.
    pub fn new(value: impl Into<String>) -> Result<Self, SessionError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SessionError::InvalidToken("token is empty".to_string()));
        }
        if http::HeaderValue::from_str(&value).is_err() {
            return Err(SessionError::InvalidToken(
                "token contains characters not allowed in an HTTP header".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

// =============================================================================
// SessionProvider Trait
// =============================================================================

/// Source of access tokens.
///
/// Called once per outbound request. Implementations may suspend while they
/// refresh an underlying session, and must fail rather than return a stale or
/// empty token.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a token for the current session.
    async fn acquire_token(&self) -> Result<Token, SessionError>;
}

#[async_trait]
impl<P> SessionProvider for Arc<P>
where
    P: SessionProvider + ?Sized,
{
    async fn acquire_token(&self) -> Result<Token, SessionError> {
        (**self).acquire_token().await
    }
}
