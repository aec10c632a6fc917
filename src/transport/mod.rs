//! Authenticated HTTP transport.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │            AuthenticatedTransport           │
//! │  token ──► URL + headers + body ──► decode  │
//! └───────────┬──────────────────────┬──────────┘
//!             │                      │
//!             ▼                      ▼
//!  ┌────────────────────┐  ┌─────────────────────┐
//!  │  SessionProvider   │  │  HttpBackend trait  │
//!  └────────────────────┘  └──────────┬──────────┘
//!                                     ▼
//!                          ┌─────────────────────┐
//!                          │   ReqwestBackend    │
//!                          └─────────────────────┘
//! ```

mod authenticated;
mod backend;

pub use authenticated::{decode_body, AuthenticatedTransport, Payload};
pub use backend::{HttpBackend, ReqwestBackend};
