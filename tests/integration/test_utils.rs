//! Test utilities for integration tests.
//!
//! This module provides mock session providers, HTTP backends and file handles
//! that record what the client does, so tests can assert on the exact requests
//! dispatched and on the order of events.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;
use tokio::sync::{Notify, RwLock};

use hma_client::error::{SessionError, TransportError};
use hma_client::{
    ApiConfig, AuthenticatedTransport, FileHandle, HmaClient, HttpBackend, SessionProvider, Token,
};

/// Base URL used for every mock-backed client.
pub const TEST_BASE_URL: &str = "https://hma.test/api";

// =============================================================================
// Event Log
// =============================================================================

/// Shared, ordered record of what happened during a call.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

// =============================================================================
// Mock Session Provider
// =============================================================================

/// A session provider that counts calls and can be told to fail.
#[derive(Clone)]
pub struct CountingSession {
    token: Option<String>,
    calls: Arc<AtomicUsize>,
    log: Option<EventLog>,
}

impl CountingSession {
    /// Hands out `token` on every call.
    pub fn new(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            log: None,
        }
    }

    /// Always fails with `SessionError::NoSession`.
    pub fn signed_out() -> Self {
        Self {
            token: None,
            calls: Arc::new(AtomicUsize::new(0)),
            log: None,
        }
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for CountingSession {
    async fn acquire_token(&self) -> Result<Token, SessionError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref log) = self.log {
            log.push("token");
        }
        match self.token {
            // A distinct token per call makes freshness observable
            Some(ref token) => Token::new(format!("{}-{}", token, n)),
            None => Err(SessionError::NoSession),
        }
    }
}

// =============================================================================
// Recording HTTP Backend
// =============================================================================

/// A request as seen by the backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// A backend that records every request and replies from a queue.
///
/// When the queue is empty it replies `200 {}`. An optional gate holds each
/// reply until the test releases it.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
    responses: Arc<Mutex<VecDeque<(StatusCode, Bytes)>>>,
    gate: Option<Arc<Notify>>,
    log: Option<EventLog>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn respond(self, status: StatusCode, body: impl Into<Bytes>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
        self
    }

    /// Hold every reply until `gate.notify_one()` is called.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_log(mut self, log: EventLog) -> Self {
        self.log = Some(log);
        self
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// The single request dispatched so far.
    pub async fn only_request(&self) -> RecordedRequest {
        let requests = self.requests().await;
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

#[async_trait]
impl HttpBackend for RecordingBackend {
    async fn dispatch(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, TransportError> {
        let (parts, body) = request.into_parts();
        let query = parts
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default();

        self.requests.write().await.push(RecordedRequest {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query,
            headers: parts.headers,
            body,
        });
        if let Some(ref log) = self.log {
            log.push("dispatch");
        }

        if let Some(ref gate) = self.gate {
            gate.notified().await;
        }

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((StatusCode::OK, Bytes::from_static(b"{}")));

        let mut response = http::Response::new(body);
        *response.status_mut() = status;
        if let Some(ref log) = self.log {
            log.push("response");
        }
        Ok(response)
    }
}

// =============================================================================
// Mock File Handles
// =============================================================================

/// A file whose read completes after a delay and is logged.
pub struct SlowFile {
    pub name: String,
    pub data: Bytes,
    pub delay: Duration,
    pub reads: Arc<AtomicUsize>,
    pub log: EventLog,
}

impl SlowFile {
    pub fn new(name: &str, data: impl Into<Bytes>, log: EventLog) -> Self {
        Self {
            name: name.to_string(),
            data: data.into(),
            delay: Duration::from_millis(20),
            reads: Arc::new(AtomicUsize::new(0)),
            log,
        }
    }
}

#[async_trait]
impl FileHandle for SlowFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn read_all(&self) -> std::io::Result<Bytes> {
        tokio::time::sleep(self.delay).await;
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.log.push("read");
        Ok(self.data.clone())
    }
}

/// A file that cannot be read.
pub struct UnreadableFile;

#[async_trait]
impl FileHandle for UnreadableFile {
    fn name(&self) -> &str {
        "locked.jpg"
    }

    async fn read_all(&self) -> std::io::Result<Bytes> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ))
    }
}

// =============================================================================
// Client Construction
// =============================================================================

/// Build a client over the given mocks.
pub fn mock_client(
    session: CountingSession,
    backend: RecordingBackend,
) -> HmaClient<CountingSession, RecordingBackend> {
    let config = ApiConfig::parse(TEST_BASE_URL).unwrap();
    HmaClient::new(AuthenticatedTransport::new(config, session, backend))
}

/// Path as dispatched, given a route.
pub fn api_path(route: &str) -> String {
    format!("/api{}", route)
}
