use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;
use crate::error::TransportError;

/// Performs one HTTP exchange.
///
/// This is the only place the network is touched. The authenticated transport
/// hands it a complete request (URL, headers including `Authorization`, body)
/// and gets back the raw response.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn dispatch(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError>;
}

/// `reqwest`-backed implementation of [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: Client,
}

impl ReqwestBackend {
    /// Build a client honouring the timeouts in `config`.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(concat!("hma-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                TransportError::InvalidRequest(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn dispatch(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let request = reqwest::Request::try_from(request)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let resp = self.client.execute(request).await.map_err(map_reqwest_error)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        debug!("Received {} ({} bytes)", status, body.len());

        let mut response = http::Response::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}
