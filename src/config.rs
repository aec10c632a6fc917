//! Configuration for the HMA client.
//!
//! [`ApiConfig`] is the library-side description of the one backend API the
//! client talks to. It is passed explicitly to the transport; nothing is
//! looked up from global state.
//!
//! The binary builds it from [`Cli`], which reads command-line arguments and
//! environment variables with the `HMA_` prefix:
//!
//! - `HMA_API_URL` - Base URL of the HMA API, including any stage path (required)
//! - `HMA_TOKEN` - Access token to send with every request
//! - `HMA_TOKEN_FILE` - File holding the access token, re-read for every request
//! - `HMA_AUTH_SCHEME` - `raw` (default) or `bearer`
//! - `HMA_TIMEOUT_SECS` - Whole-request timeout (default: 120)
//! - `HMA_CONNECT_TIMEOUT_SECS` - Connect timeout (default: 10)

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::request::OpinionChange;

// =============================================================================
// Default Values
// =============================================================================

/// Default name of the backend API configuration.
pub const DEFAULT_API_NAME: &str = "hma_api";

/// Default whole-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// API Configuration
// =============================================================================

/// How the token is placed in the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AuthScheme {
    /// The bare token, as the HMA API gateway expects
    #[default]
    Raw,

    /// `Bearer <token>`
    Bearer,
}

impl AuthScheme {
    /// Header value for `token` under this scheme.
    pub fn header_value(&self, token: &str) -> String {
        match self {
            AuthScheme::Raw => token.to_string(),
            AuthScheme::Bearer => format!("Bearer {}", token),
        }
    }
}

/// The single backend API the client targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Name used in logs to identify the API
    pub name: String,

    /// Base URL; routes are appended to its path
    pub base_url: Url,

    /// Whole-request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// Authorization header scheme
    pub auth_scheme: AuthScheme,
}

impl ApiConfig {
    /// Create a configuration for `base_url` with default settings.
    pub fn new(base_url: Url) -> Self {
        Self {
            name: DEFAULT_API_NAME.to_string(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            auth_scheme: AuthScheme::Raw,
        }
    }

    /// Parse `base_url` and create a configuration with default settings.
    pub fn parse(base_url: &str) -> Result<Self, String> {
        let url =
            Url::parse(base_url).map_err(|e| format!("invalid API URL '{}': {}", base_url, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "invalid API URL '{}': scheme must be http or https",
                base_url
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(format!(
                "invalid API URL '{}': must not carry a query or fragment",
                base_url
            ));
        }
        Ok(Self::new(url))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// HMA client - query and submit content to a hasher-matcher-actioner API.
#[derive(Parser, Debug, Clone)]
#[command(name = "hma-client")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionConfig,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and authentication settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of the HMA API (including the stage path, if any).
    #[arg(long, env = "HMA_API_URL")]
    pub api_url: String,

    /// Access token sent with every request. Takes precedence over --token-file.
    #[arg(long, env = "HMA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the access token, re-read before every request.
    #[arg(long, env = "HMA_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// How the token is placed in the Authorization header.
    #[arg(long, value_enum, default_value_t = AuthScheme::Raw, env = "HMA_AUTH_SCHEME")]
    pub auth_scheme: AuthScheme,

    /// Whole-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, env = "HMA_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS, env = "HMA_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: u64,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ConnectionConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("API URL is required. Set --api-url or HMA_API_URL".to_string());
        }
        ApiConfig::parse(&self.api_url)?;

        if self.token.is_none() && self.token_file.is_none() {
            return Err(
                "No credentials provided. Set --token/HMA_TOKEN or --token-file/HMA_TOKEN_FILE"
                    .to_string(),
            );
        }
        if matches!(self.token.as_deref(), Some(t) if t.trim().is_empty()) {
            return Err("Token must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than 0".to_string());
        }
        if self.connect_timeout_secs > self.timeout_secs {
            return Err("connect_timeout_secs must not exceed timeout_secs".to_string());
        }

        Ok(())
    }

    /// Where the token comes from. An explicit token wins over a token file.
    pub fn token_source(&self) -> Option<TokenSource<'_>> {
        match (&self.token, &self.token_file) {
            (Some(token), _) => Some(TokenSource::Inline(token.trim())),
            (None, Some(path)) => Some(TokenSource::File(path)),
            (None, None) => None,
        }
    }

    /// Build the API configuration (call validate() first).
    pub fn api_config(&self) -> Result<ApiConfig, String> {
        Ok(ApiConfig::parse(&self.api_url)?
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .with_auth_scheme(self.auth_scheme))
    }
}

/// Origin of the access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource<'a> {
    Inline(&'a str),
    File(&'a Path),
}

/// Opinion change as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpinionChangeArg {
    TruePositive,
    FalsePositive,
    Remove,
}

impl From<OpinionChangeArg> for OpinionChange {
    fn from(arg: OpinionChangeArg) -> Self {
        match arg {
            OpinionChangeArg::TruePositive => OpinionChange::MarkTruePositive,
            OpinionChangeArg::FalsePositive => OpinionChange::MarkFalsePositive,
            OpinionChangeArg::Remove => OpinionChange::RemoveOpinion,
        }
    }
}

/// One subcommand per domain operation.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List matches: all, for a signal, or for a piece of content.
    Matches {
        /// Signal ID to filter by (requires --signal-source).
        #[arg(long, requires = "signal_source", conflicts_with = "content_id")]
        signal_id: Option<String>,

        /// Signal source, e.g. "te".
        #[arg(long, requires = "signal_id")]
        signal_source: Option<String>,

        /// Content ID to filter by.
        #[arg(long)]
        content_id: Option<String>,
    },

    /// Show the details of one match.
    MatchDetails { key: String },

    /// Show the hash record for a content key.
    Hash { key: String },

    /// Download the image for a content key.
    Image {
        key: String,

        /// Write the image here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the signal summary.
    Signals,

    /// Fetch a dashboard card summary by path.
    Dashboard { path: String },

    /// Upload an image file.
    UploadImage { file: PathBuf },

    /// Request a change of opinion on a signal.
    OpinionChange {
        #[arg(long)]
        signal_id: String,

        #[arg(long)]
        signal_source: String,

        #[arg(long)]
        dataset: String,

        #[arg(long, value_enum)]
        change: OpinionChangeArg,
    },

    /// Submit content by reference.
    Submit {
        #[arg(long)]
        submission_type: String,

        #[arg(long)]
        content_id: String,

        #[arg(long)]
        content_type: String,

        #[arg(long)]
        content_ref: String,

        /// Metadata as a JSON document.
        #[arg(long, default_value = "{}")]
        metadata: String,
    },

    /// Submit content by uploading a local file.
    SubmitUpload {
        #[arg(long)]
        submission_type: String,

        #[arg(long)]
        content_id: String,

        #[arg(long)]
        content_type: String,

        /// File whose contents become the content reference.
        #[arg(long)]
        file: PathBuf,

        /// Metadata as a JSON document.
        #[arg(long, default_value = "{}")]
        metadata: String,
    },
}

/// Parse a `--metadata` argument.
pub fn parse_metadata(raw: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("metadata is not valid JSON: {}", e))
}

// =============================================================================
// Tests
// =============================================================================
