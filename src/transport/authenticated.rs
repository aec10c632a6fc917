use bytes::Bytes;
use http::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::HttpBackend;
use crate::config::ApiConfig;
use crate::error::{ClientError, DecodeError, SessionError, TransportError};
use crate::request::{RequestDescriptor, ResponseType};
use crate::session::{SessionProvider, Token};

// =============================================================================
// Payload
// =============================================================================

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Binary(Bytes),
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Payload::Json(_) => "json",
            Payload::Binary(_) => "binary",
        }
    }

    /// The JSON value, or a decode error if this is a binary payload.
    pub fn into_json(self) -> Result<Value, DecodeError> {
        match self {
            Payload::Json(value) => Ok(value),
            other => Err(DecodeError::UnexpectedPayload {
                expected: "json",
                actual: other.kind(),
            }),
        }
    }

    /// The raw bytes, or a decode error if this is a JSON payload.
    pub fn into_binary(self) -> Result<Bytes, DecodeError> {
        match self {
            Payload::Binary(bytes) => Ok(bytes),
            other => Err(DecodeError::UnexpectedPayload {
                expected: "binary",
                actual: other.kind(),
            }),
        }
    }
}

/// Decode `body` according to `response_type`.
///
/// An empty JSON body decodes to `null`; some write endpoints answer with no
/// content.
pub fn decode_body(response_type: ResponseType, body: Bytes) -> Result<Payload, DecodeError> {
    match response_type {
        ResponseType::Binary => Ok(Payload::Binary(body)),
        ResponseType::Json if body.iter().all(u8::is_ascii_whitespace) => {
            Ok(Payload::Json(Value::Null))
        }
        ResponseType::Json => serde_json::from_slice(&body)
            .map(Payload::Json)
            .map_err(|e| DecodeError::Json(e.to_string())),
    }
}

/// `.` or `..`, in any percent-encoded spelling.
fn is_dot_segment(segment: &str) -> bool {
    matches!(urlencoding::decode(segment).as_deref(), Ok(".") | Ok(".."))
}

// =============================================================================
// Authenticated Transport
// =============================================================================

/// Executes request descriptors against one configured API, attaching a
/// freshly acquired token to each.
///
/// # Algorithm
///
/// 1. Acquire a token from the session provider (failure stops here; nothing
///    is dispatched)
/// 2. Build the URL, headers and JSON body from the descriptor
/// 3. Dispatch through the [`HttpBackend`]
/// 4. Reject non-2xx statuses
/// 5. Decode per the descriptor's response type
///
/// No retries. Every failure is returned unchanged.
#[derive(Debug, Clone)]
pub struct AuthenticatedTransport<S, B> {
    config: ApiConfig,
    session: S,
    backend: B,
}

impl<S, B> AuthenticatedTransport<S, B>
where
    S: SessionProvider,
    B: HttpBackend,
{
    pub fn new(config: ApiConfig, session: S, backend: B) -> Self {
        Self {
            config,
            session,
            backend,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Execute `descriptor` and decode the response.
    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<Payload, ClientError> {
        let token = self.session.acquire_token().await.map_err(|e| {
            warn!(
                "{}: not dispatching {} {}: {}",
                self.config.name,
                descriptor.method(),
                descriptor.route(),
                e
            );
            e
        })?;

        let request = self.build_request(&descriptor, &token)?;
        debug!(
            "{}: {} {}",
            self.config.name,
            descriptor.method(),
            descriptor.route()
        );

        let response = self.backend.dispatch(request).await?;
        let status = response.status();
        debug!(
            "{}: {} {} -> {}",
            self.config.name,
            descriptor.method(),
            descriptor.route(),
            status
        );

        if !status.is_success() {
            let body = String::from_utf8_lossy(response.body()).into_owned();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(decode_body(descriptor.response_type(), response.into_body())?)
    }

    /// Full URL for a descriptor: base URL path + route, plus the query.
    ///
    /// Routes containing a `.` or `..` segment are rejected: URL
    /// normalization would collapse them and address a different route.
    pub fn url_for(&self, descriptor: &RequestDescriptor) -> Result<Url, ClientError> {
        let route = descriptor.route();
        if let Some(segment) = route.split('/').find(|s| is_dot_segment(s)) {
            return Err(ClientError::InvalidRequest(format!(
                "route {} contains a '{}' path segment",
                route, segment
            )));
        }

        let mut url = self.config.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        let path = format!("{}{}", url.path().trim_end_matches('/'), route);
        url.set_path(&path);

        if !descriptor.query_params().is_empty() {
            url.query_pairs_mut()
                .extend_pairs(descriptor.query_params().iter());
        }
        Ok(url)
    }

    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        token: &Token,
    ) -> Result<http::Request<Bytes>, ClientError> {
        let url = self.url_for(descriptor)?;

        let mut authorization =
            HeaderValue::from_str(&self.config.auth_scheme.header_value(token.as_str()))
                .map_err(|e| SessionError::InvalidToken(e.to_string()))?;
        authorization.set_sensitive(true);

        let mut builder = http::Request::builder()
            .method(descriptor.method().clone())
            .uri(url.as_str())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, descriptor.response_type().accept());

        let body = match descriptor.body() {
            Some(body) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                let encoded = serde_json::to_vec(body)
                    .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
                Bytes::from(encoded)
            }
            None => Bytes::new(),
        };

        builder
            .body(body)
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))
    }
}
