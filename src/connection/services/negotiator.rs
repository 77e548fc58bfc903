//! Credential negotiation with a live notebook server.

use super::cancellation::{Cancelled, until_cancelled};
use crate::connection::{
    domain::{BaseEndpoint, ConnectionFailure, Credentials, TlsMode},
    ports::{ConnectionPrompt, LoginResult, NotebookServerApi, ServerApiError},
};
use secrecy::{ExposeSecret as _, SecretString};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Reasons a negotiation ended without credentials.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NegotiationError {
    /// The server rejected the supplied password.
    #[error("server rejected the supplied credentials")]
    InvalidCredentials,

    /// The transport refused the server certificate.
    #[error("server certificate is not trusted: {0}")]
    UntrustedCertificate(String),

    /// The server could not be reached or answered unexpectedly.
    #[error("network failure: {0}")]
    Network(String),

    /// The cancellation signal fired or the password prompt was dismissed.
    #[error("negotiation cancelled")]
    Cancelled,
}

impl NegotiationError {
    /// Converts the error into the terminal failure for `endpoint`.
    ///
    /// A certificate error that reaches this point was not gated and is
    /// reported as a network failure.
    #[must_use]
    pub fn into_failure(self, endpoint: &BaseEndpoint) -> ConnectionFailure {
        match self {
            Self::InvalidCredentials => ConnectionFailure::InvalidCredentials {
                base_endpoint: endpoint.clone(),
            },
            Self::UntrustedCertificate(reason) | Self::Network(reason) => {
                ConnectionFailure::NetworkFailure {
                    base_endpoint: endpoint.clone(),
                    reason,
                }
            }
            Self::Cancelled => ConnectionFailure::Cancelled,
        }
    }
}

impl From<ServerApiError> for NegotiationError {
    fn from(err: ServerApiError) -> Self {
        match err {
            ServerApiError::UntrustedCertificate(reason) => Self::UntrustedCertificate(reason),
            other => Self::Network(other.to_string()),
        }
    }
}

impl From<Cancelled> for NegotiationError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Decides what a server requires and validates credentials against it.
///
/// One password attempt per negotiation: a rejected password ends the
/// negotiation, and retrying is a fresh attempt.
pub struct CredentialNegotiator<A, P>
where
    A: NotebookServerApi,
    P: ConnectionPrompt,
{
    api: Arc<A>,
    prompt: Arc<P>,
}

impl<A, P> CredentialNegotiator<A, P>
where
    A: NotebookServerApi,
    P: ConnectionPrompt,
{
    /// Creates a negotiator.
    #[must_use]
    pub const fn new(api: Arc<A>, prompt: Arc<P>) -> Self {
        Self { api, prompt }
    }

    /// Negotiates credentials for `endpoint`.
    ///
    /// The server is probed first; anonymous servers succeed with empty
    /// credentials. A non-empty `embedded_token` is tried before the user is
    /// asked for a password. Every request and prompt is raced against
    /// `cancel`.
    ///
    /// # Errors
    ///
    /// Returns [`NegotiationError`] when the password is rejected, the
    /// transport fails, or the attempt is cancelled.
    pub async fn negotiate(
        &self,
        endpoint: &BaseEndpoint,
        embedded_token: Option<&SecretString>,
        tls: TlsMode,
        cancel: &CancellationToken,
    ) -> Result<Credentials, NegotiationError> {
        let probe = until_cancelled(cancel, self.api.probe(endpoint, tls)).await??;
        debug!(
            endpoint = %endpoint,
            version = probe.version().unwrap_or("unknown"),
            auth_required = probe.auth_required(),
            "probed notebook server"
        );
        if !probe.auth_required() {
            return Ok(Credentials::anonymous());
        }

        if let Some(token) = embedded_token.filter(|token| !token.expose_secret().is_empty()) {
            if until_cancelled(cancel, self.api.check_token(endpoint, token, tls)).await?? {
                debug!(endpoint = %endpoint, "embedded token accepted");
                return Ok(Credentials::with_token(token.clone()));
            }
            debug!(endpoint = %endpoint, "embedded token rejected; asking for a password");
        }

        let password = until_cancelled(cancel, self.prompt.request_password(endpoint))
            .await?
            .answered()
            .ok_or(NegotiationError::Cancelled)?;

        match until_cancelled(cancel, self.api.login(endpoint, &password, tls)).await?? {
            LoginResult::Accepted => {
                debug!(endpoint = %endpoint, "password accepted");
                Ok(Credentials::with_password(password))
            }
            LoginResult::Rejected => {
                warn!(endpoint = %endpoint, "password rejected");
                Err(NegotiationError::InvalidCredentials)
            }
        }
    }
}
