//! Concrete session providers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{SessionProvider, Token};
use crate::error::SessionError;

/// Provider that hands out the same token on every call.
///
/// Useful for scripted access with a token obtained elsewhere, and in tests.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: Token,
}

impl StaticTokenProvider {
    pub fn new(token: Token) -> Self {
        Self { token }
    }
}

#[async_trait]
impl SessionProvider for StaticTokenProvider {
    async fn acquire_token(&self) -> Result<Token, SessionError> {
        Ok(self.token.clone())
    }
}

/// Provider that reads the token from a file on every call.
///
/// An external agent (a login helper, a sidecar refreshing credentials) keeps
/// the file current; this provider never caches what it read.
#[derive(Debug, Clone)]
pub struct TokenFileProvider {
    path: PathBuf,
}

impl TokenFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionProvider for TokenFileProvider {
    async fn acquire_token(&self) -> Result<Token, SessionError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Token file {} does not exist", self.path.display());
                return Err(SessionError::NoSession);
            }
            Err(e) => {
                return Err(SessionError::Provider(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let value = contents.trim();
        if value.is_empty() {
            return Err(SessionError::NoSession);
        }

        Token::new(value)
    }
}
