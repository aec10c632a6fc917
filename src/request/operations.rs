//! Route table for the HMA API.
//!
//! Each function maps one domain operation onto the exact method, path,
//! query and body the backend expects. Which arguments travel in the body and
//! which in the query is fixed by the backend, not by REST convention: the
//! opinion-change write, for instance, is keyed entirely by query parameters.
//!
//! ```text
//! GET  /matches/                                 all / by signal / by content
//! GET  /matches/match/{key}/                     match details
//! GET  /hash/{key}                               hash details
//! GET  /image/{key}                              raw image bytes
//! GET  /signals                                  signal summary
//! GET  /{path}                                   dashboard card summary
//! POST /upload                                   base64 image upload
//! POST /matches/request-signal-opinion-change/   opinion change (query only)
//! POST /submit/                                  content submission
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::{json, Value};

use super::RequestDescriptor;
use crate::encode::EncodedFile;

// =============================================================================
// Route Constants
// =============================================================================

pub const MATCHES_ROUTE: &str = "/matches/";
pub const SIGNALS_ROUTE: &str = "/signals";
pub const UPLOAD_ROUTE: &str = "/upload";
pub const OPINION_CHANGE_ROUTE: &str = "/matches/request-signal-opinion-change/";
pub const SUBMIT_ROUTE: &str = "/submit/";

// =============================================================================
// Request Types
// =============================================================================

/// Requested change to the opinion held on a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpinionChange {
    MarkTruePositive,
    MarkFalsePositive,
    RemoveOpinion,
}

impl OpinionChange {
    /// Wire value expected by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpinionChange::MarkTruePositive => "MARK_TRUE_POSITIVE",
            OpinionChange::MarkFalsePositive => "MARK_FALSE_POSITIVE",
            OpinionChange::RemoveOpinion => "REMOVE_OPINION",
        }
    }
}

impl fmt::Display for OpinionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a `/submit/` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentSubmission {
    pub submission_type: String,
    pub content_id: String,
    pub content_type: String,
    /// Reference to the content, or its base64 encoding for uploads
    pub content_ref: String,
    pub metadata: Value,
}

impl ContentSubmission {
    pub fn new(
        submission_type: impl Into<String>,
        content_id: impl Into<String>,
        content_type: impl Into<String>,
        content_ref: impl Into<String>,
        metadata: Value,
    ) -> Self {
        Self {
            submission_type: submission_type.into(),
            content_id: content_id.into(),
            content_type: content_type.into(),
            content_ref: content_ref.into(),
            metadata,
        }
    }

    /// The `/submit/` body with the backend's snake_case keys.
    pub fn to_json(&self) -> Value {
        json!({
            "submission_type": self.submission_type,
            "content_id": self.content_id,
            "content_type": self.content_type,
            "content_ref": self.content_ref,
            "metadata": self.metadata,
        })
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Percent-encode a key so it stays a single path segment.
fn segment(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

pub fn fetch_all_matches() -> RequestDescriptor {
    RequestDescriptor::get(MATCHES_ROUTE)
}

pub fn fetch_matches_by_signal(signal_id: &str, signal_source: &str) -> RequestDescriptor {
    RequestDescriptor::get(MATCHES_ROUTE)
        .query("signal_q", signal_id)
        .query("signal_source", signal_source)
}

pub fn fetch_matches_by_content(content_id: &str) -> RequestDescriptor {
    RequestDescriptor::get(MATCHES_ROUTE).query("content_q", content_id)
}

pub fn fetch_match_details(key: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/matches/match/{}/", segment(key)))
}

pub fn fetch_hash(key: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/hash/{}", segment(key)))
}

pub fn fetch_image(key: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/image/{}", segment(key))).binary()
}

pub fn fetch_signal_summary() -> RequestDescriptor {
    RequestDescriptor::get(SIGNALS_ROUTE)
}

/// The path suffix is caller-supplied and may span several segments, so it is
/// not encoded.
pub fn fetch_dashboard_card_summary(path: &str) -> RequestDescriptor {
    RequestDescriptor::get(format!("/{}", path.trim_start_matches('/')))
}

pub fn upload_image(file: &EncodedFile) -> RequestDescriptor {
    let body = json!({
        "fileName": file.name,
        "fileContentsBase64Encoded": file.contents_base64,
    });
    RequestDescriptor::post(UPLOAD_ROUTE, body)
}

/// Opinion changes are keyed by query parameters; the body is an empty object.
pub fn request_signal_opinion_change(
    signal_id: &str,
    signal_source: &str,
    dataset: &str,
    change: OpinionChange,
) -> RequestDescriptor {
    RequestDescriptor::post(OPINION_CHANGE_ROUTE, json!({}))
        .query("signal_q", signal_id)
        .query("signal_source", signal_source)
        .query("dataset_q", dataset)
        .query("opinion_change", change.as_str())
}

pub fn submit_content(submission: &ContentSubmission) -> RequestDescriptor {
    RequestDescriptor::post(SUBMIT_ROUTE, submission.to_json())
}

/// Same body as [`submit_content`], with `content_ref` carrying the encoded file.
pub fn submit_content_upload(
    submission_type: &str,
    content_id: &str,
    content_type: &str,
    file: &EncodedFile,
    metadata: Value,
) -> RequestDescriptor {
    submit_content(&ContentSubmission::new(
        submission_type,
        content_id,
        content_type,
        file.contents_base64.as_str(),
        metadata,
    ))
}
