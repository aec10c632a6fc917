//! # HMA Client
//!
//! An authenticated client for the hasher-matcher-actioner (HMA) API.
//!
//! This library is the data-access layer between an HMA front end and the
//! matching/hashing backend. It turns domain operations (fetch matches, fetch
//! hashes and images, submit content, change an opinion on a signal) into
//! HTTP requests, attaches a freshly acquired token to each one, and decodes
//! the responses.
//!
//! ## Features
//!
//! - **Per-request tokens**: every call asks the [`SessionProvider`] for a token; nothing is cached
//! - **Exact route table**: one pure builder per operation, testable without a network
//! - **File uploads**: files are read once and sent as base64 text inside the JSON body
//! - **Pluggable transport**: [`HttpBackend`] is the network seam, [`ReqwestBackend`] the default
//!
//! ## Architecture
//!
//! - [`client`] - Domain operations ([`HmaClient`])
//! - [`request`] - Request descriptors and the route table
//! - [`transport`] - Authenticated transport and HTTP backends
//! - [`session`] - Session provider trait and token sources
//! - [`encode`] - File handles and base64 encoding
//! - [`config`] - API configuration and CLI types
//!
//! ```text
//! HmaClient ──► encode_file (uploads) ──► operations::* ──► AuthenticatedTransport
//!                                                             │            │
//!                                                  SessionProvider    HttpBackend
//! ```

pub mod client;
pub mod config;
pub mod encode;
pub mod error;
pub mod request;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use client::HmaClient;
pub use config::{ApiConfig, AuthScheme, Cli, Command, ConnectionConfig};
pub use encode::{encode_file, EncodedFile, FileHandle, LocalFile, MemoryFile};
pub use error::{ClientError, DecodeError, SessionError, TransportError};
pub use request::{ContentSubmission, OpinionChange, RequestDescriptor, ResponseType};
pub use session::{SessionProvider, StaticTokenProvider, Token, TokenFileProvider};
pub use transport::{AuthenticatedTransport, HttpBackend, Payload, ReqwestBackend};
