//! Client port for the notebook server REST surface.

use crate::connection::domain::{BaseEndpoint, TlsMode};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notebook server API operations.
pub type ServerApiResult<T> = Result<T, ServerApiError>;

/// What the root probe learnt about a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProbe {
    version: Option<String>,
    auth_required: bool,
}

impl ServerProbe {
    /// Creates a probe result.
    #[must_use]
    pub const fn new(version: Option<String>, auth_required: bool) -> Self {
        Self {
            version,
            auth_required,
        }
    }

    /// Returns the server version reported by the root info endpoint.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Returns whether the server refuses anonymous API access.
    #[must_use]
    pub const fn auth_required(&self) -> bool {
        self.auth_required
    }
}

/// Server verdict on a password login.
///
/// Acceptance requires the server to open a session; the session itself is
/// not kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginResult {
    /// The password was accepted.
    Accepted,
    /// The password was rejected.
    Rejected,
}

/// Requests a resolution attempt sends to a notebook server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotebookServerApi: Send + Sync {
    /// Queries the root info endpoint and whether anonymous access works.
    async fn probe(&self, endpoint: &BaseEndpoint, tls: TlsMode) -> ServerApiResult<ServerProbe>;

    /// Returns whether the server accepts `token`.
    async fn check_token(
        &self,
        endpoint: &BaseEndpoint,
        token: &SecretString,
        tls: TlsMode,
    ) -> ServerApiResult<bool>;

    /// Submits `password` to the login endpoint.
    async fn login(
        &self,
        endpoint: &BaseEndpoint,
        password: &SecretString,
        tls: TlsMode,
    ) -> ServerApiResult<LoginResult>;
}

/// Errors returned by notebook server API adapters.
#[derive(Debug, Clone, Error)]
pub enum ServerApiError {
    /// The server certificate does not chain to a trusted root.
    #[error("server certificate is not trusted: {0}")]
    UntrustedCertificate(String),

    /// The server could not be reached or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a status the protocol does not expect.
    #[error("unexpected HTTP {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The server answered with a body the protocol does not expect.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Requested URL.
        url: String,
        /// Decoding failure description.
        reason: String,
    },

    /// Generic adapter failure.
    #[error("server API runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServerApiError {
    /// Wraps an adapter failure.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
