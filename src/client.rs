//! Domain operations of the HMA API.
//!
//! [`HmaClient`] is the caller-facing surface: one async method per use case.
//! Each method builds a descriptor with the matching builder from
//! [`crate::request::operations`] and sends it through the
//! [`AuthenticatedTransport`]. Upload-style methods encode the file first and
//! only then build and send the POST, so the returned future completes after
//! the POST response arrives.
//!
//! # Example
//!
//! ```rust,no_run
//! use hma_client::{ApiConfig, HmaClient, StaticTokenProvider, Token};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ApiConfig::parse("https://hma.example.com/prod")?;
//! let session = StaticTokenProvider::new(Token::new("eyJ...")?);
//! let client = HmaClient::connect(config, session)?;
//!
//! let matches = client.fetch_matches_by_signal("abc123", "pdq").await?;
//! println!("{}", matches);
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use serde_json::Value;
use tracing::info;

use crate::config::ApiConfig;
use crate::encode::{encode_file, FileHandle};
use crate::error::ClientError;
use crate::request::operations::{self, ContentSubmission, OpinionChange};
use crate::request::RequestDescriptor;
use crate::session::SessionProvider;
use crate::transport::{AuthenticatedTransport, HttpBackend, ReqwestBackend};

/// Client for the HMA API.
///
/// Calls share no mutable state: each one acquires its own token and builds
/// its own request, so a single client can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct HmaClient<S, B = ReqwestBackend> {
    transport: AuthenticatedTransport<S, B>,
}

impl<S> HmaClient<S, ReqwestBackend>
where
    S: SessionProvider,
{
    /// Create a client that talks HTTP via `reqwest`.
    pub fn connect(config: ApiConfig, session: S) -> Result<Self, ClientError> {
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self::new(AuthenticatedTransport::new(config, session, backend)))
    }
}

impl<S, B> HmaClient<S, B>
where
    S: SessionProvider,
    B: HttpBackend,
{
    /// Create a client over an existing transport, e.g. one with a mock backend.
    pub fn new(transport: AuthenticatedTransport<S, B>) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &AuthenticatedTransport<S, B> {
        &self.transport
    }

    async fn send_json(&self, descriptor: RequestDescriptor) -> Result<Value, ClientError> {
        Ok(self.transport.send(descriptor).await?.into_json()?)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Every match. GET `/matches/`.
    pub async fn fetch_all_matches(&self) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_all_matches()).await
    }

    /// Matches for one signal. GET `/matches/?signal_q=..&signal_source=..`.
    pub async fn fetch_matches_by_signal(
        &self,
        signal_id: &str,
        signal_source: &str,
    ) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_matches_by_signal(signal_id, signal_source))
            .await
    }

    /// Matches for one piece of content. GET `/matches/?content_q=..`.
    pub async fn fetch_matches_by_content(&self, content_id: &str) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_matches_by_content(content_id))
            .await
    }

    /// Details of one match. GET `/matches/match/{key}/`.
    pub async fn fetch_match_details(&self, key: &str) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_match_details(key)).await
    }

    /// Hash record for a content key. GET `/hash/{key}`.
    pub async fn fetch_hash(&self, key: &str) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_hash(key)).await
    }

    /// Raw image bytes, exactly as served. GET `/image/{key}`.
    pub async fn fetch_image(&self, key: &str) -> Result<Bytes, ClientError> {
        Ok(self
            .transport
            .send(operations::fetch_image(key))
            .await?
            .into_binary()?)
    }

    /// Summary of all signals. GET `/signals`.
    pub async fn fetch_signal_summary(&self) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_signal_summary()).await
    }

    /// Data for one dashboard card. GET `/{path}`.
    pub async fn fetch_dashboard_card_summary(&self, path: &str) -> Result<Value, ClientError> {
        self.send_json(operations::fetch_dashboard_card_summary(path))
            .await
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Encode `file` and upload it to `/upload`.
    pub async fn upload_image<F>(&self, file: &F) -> Result<Value, ClientError>
    where
        F: FileHandle + ?Sized,
    {
        let encoded = encode_file(file).await?;
        info!("Uploading image '{}' ({} bytes)", encoded.name, encoded.size);
        self.send_json(operations::upload_image(&encoded)).await
    }

    /// Ask for the opinion on a signal in `dataset` to change.
    /// POST `/matches/request-signal-opinion-change/`; returns the decoded response.
    pub async fn request_signal_opinion_change(
        &self,
        signal_id: &str,
        signal_source: &str,
        dataset: &str,
        change: OpinionChange,
    ) -> Result<Value, ClientError> {
        self.send_json(operations::request_signal_opinion_change(
            signal_id,
            signal_source,
            dataset,
            change,
        ))
        .await
    }

    /// Submit content by reference. POST `/submit/`; returns the decoded response.
    pub async fn submit_content(
        &self,
        submission_type: &str,
        content_id: &str,
        content_type: &str,
        content_ref: &str,
        metadata: Value,
    ) -> Result<Value, ClientError> {
        let submission = ContentSubmission::new(
            submission_type,
            content_id,
            content_type,
            content_ref,
            metadata,
        );
        self.send_json(operations::submit_content(&submission)).await
    }

    /// Encode `file` and submit it with the encoded text as the content reference.
    pub async fn submit_content_upload<F>(
        &self,
        submission_type: &str,
        content_id: &str,
        content_type: &str,
        file: &F,
        metadata: Value,
    ) -> Result<Value, ClientError>
    where
        F: FileHandle + ?Sized,
    {
        let encoded = encode_file(file).await?;
        info!(
            "Submitting '{}' as content {} ({} bytes)",
            encoded.name, content_id, encoded.size
        );
        self.send_json(operations::submit_content_upload(
            submission_type,
            content_id,
            content_type,
            &encoded,
            metadata,
        ))
        .await
    }
}
