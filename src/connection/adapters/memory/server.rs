//! Deterministic in-memory notebook server.

use crate::connection::{
    domain::{BaseEndpoint, TlsMode},
    ports::{LoginResult, NotebookServerApi, ServerApiError, ServerApiResult, ServerProbe},
};
use async_trait::async_trait;
use secrecy::{ExposeSecret as _, SecretString};
use std::sync::{Arc, RwLock};

const SERVER_VERSION: &str = "7.0.0-memory";
const SELF_SIGNED_DETAIL: &str = "invalid peer certificate: self signed certificate";

/// Number of requests an [`InMemoryNotebookServer`] has answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestCounts {
    /// Probe requests.
    pub probes: usize,
    /// Token checks.
    pub token_checks: usize,
    /// Login submissions.
    pub logins: usize,
    /// Requests made while accepting invalid certificates.
    pub insecure_requests: usize,
}

/// Fake notebook server answering the client port without sockets.
///
/// Authentication is required whenever a non-empty token or password is
/// configured. The configured token is also accepted as a login password.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotebookServer {
    token: Option<String>,
    password: Option<String>,
    self_signed: bool,
    unreachable: bool,
    counts: Arc<RwLock<RequestCounts>>,
}

impl InMemoryNotebookServer {
    /// Creates a server that allows anonymous access.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `token` for API access.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Requires `password` at the login endpoint.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Presents a certificate that fails verification over `https`.
    #[must_use]
    pub const fn with_self_signed_certificate(mut self) -> Self {
        self.self_signed = true;
        self
    }

    /// Refuses every connection.
    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Returns the requests answered so far.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn request_counts(&self) -> ServerApiResult<RequestCounts> {
        let counts = self
            .counts
            .read()
            .map_err(|err| ServerApiError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(*counts)
    }

    fn auth_required(&self) -> bool {
        [self.token.as_deref(), self.password.as_deref()]
            .into_iter()
            .flatten()
            .any(|secret| !secret.is_empty())
    }

    fn accept_connection(
        &self,
        endpoint: &BaseEndpoint,
        tls: TlsMode,
        record: impl FnOnce(&mut RequestCounts),
    ) -> ServerApiResult<()> {
        let mut counts = self
            .counts
            .write()
            .map_err(|err| ServerApiError::runtime(std::io::Error::other(err.to_string())))?;
        record(&mut counts);
        if tls == TlsMode::AcceptInvalidCertificates {
            counts.insecure_requests += 1;
        }

        if self.unreachable {
            return Err(ServerApiError::Network(format!(
                "connection refused by {}",
                endpoint.host_label()
            )));
        }
        if self.self_signed && endpoint.scheme().is_secure() && tls == TlsMode::Verify {
            return Err(ServerApiError::UntrustedCertificate(
                SELF_SIGNED_DETAIL.to_owned(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NotebookServerApi for InMemoryNotebookServer {
    async fn probe(&self, endpoint: &BaseEndpoint, tls: TlsMode) -> ServerApiResult<ServerProbe> {
        self.accept_connection(endpoint, tls, |counts| counts.probes += 1)?;
        Ok(ServerProbe::new(
            Some(SERVER_VERSION.to_owned()),
            self.auth_required(),
        ))
    }

    async fn check_token(
        &self,
        endpoint: &BaseEndpoint,
        token: &SecretString,
        tls: TlsMode,
    ) -> ServerApiResult<bool> {
        self.accept_connection(endpoint, tls, |counts| counts.token_checks += 1)?;
        Ok(self
            .token
            .as_deref()
            .is_some_and(|expected| !expected.is_empty() && expected == token.expose_secret()))
    }

    async fn login(
        &self,
        endpoint: &BaseEndpoint,
        password: &SecretString,
        tls: TlsMode,
    ) -> ServerApiResult<LoginResult> {
        self.accept_connection(endpoint, tls, |counts| counts.logins += 1)?;
        let supplied = password.expose_secret();
        let accepted = [self.password.as_deref(), self.token.as_deref()]
            .into_iter()
            .flatten()
            .any(|expected| !expected.is_empty() && expected == supplied);

        if accepted {
            Ok(LoginResult::Accepted)
        } else {
            Ok(LoginResult::Rejected)
        }
    }
}
