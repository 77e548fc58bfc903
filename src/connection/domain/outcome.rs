//! Terminal outcome of a resolution attempt.

use super::{AddressError, AuthMethod, BaseEndpoint, ServerProviderHandle};
use std::fmt;
use thiserror::Error;

/// Artifacts of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServer {
    handle: ServerProviderHandle,
    display_name: String,
    base_endpoint: BaseEndpoint,
    auth_method: AuthMethod,
}

impl ResolvedServer {
    /// Bundles the artifacts of a successful resolution.
    #[must_use]
    pub const fn new(
        handle: ServerProviderHandle,
        display_name: String,
        base_endpoint: BaseEndpoint,
        auth_method: AuthMethod,
    ) -> Self {
        Self {
            handle,
            display_name,
            base_endpoint,
            auth_method,
        }
    }

    /// Returns the issued provider handle.
    #[must_use]
    pub const fn handle(&self) -> &ServerProviderHandle {
        &self.handle
    }

    /// Returns the display name chosen for the server.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the canonical base endpoint.
    #[must_use]
    pub const fn base_endpoint(&self) -> &BaseEndpoint {
        &self.base_endpoint
    }

    /// Returns how the server accepted the attempt.
    #[must_use]
    pub const fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    /// Hands the provider handle to the caller.
    #[must_use]
    pub fn into_handle(self) -> ServerProviderHandle {
        self.handle
    }
}

/// Discriminant of [`ConnectionFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// See [`ConnectionFailure::MalformedAddress`].
    MalformedAddress,
    /// See [`ConnectionFailure::InvalidCredentials`].
    InvalidCredentials,
    /// See [`ConnectionFailure::UntrustedCertificateDeclined`].
    UntrustedCertificateDeclined,
    /// See [`ConnectionFailure::NetworkFailure`].
    NetworkFailure,
    /// See [`ConnectionFailure::Cancelled`].
    Cancelled,
    /// See [`ConnectionFailure::Storage`].
    Storage,
}

impl FailureKind {
    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedAddress => "malformed_address",
            Self::InvalidCredentials => "invalid_credentials",
            Self::UntrustedCertificateDeclined => "untrusted_certificate_declined",
            Self::NetworkFailure => "network_failure",
            Self::Cancelled => "cancelled",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Reasons a resolution attempt ended without a handle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectionFailure {
    /// The address could not be parsed; no request was sent.
    #[error("malformed notebook server address: {0}")]
    MalformedAddress(#[from] AddressError),

    /// The server rejected the supplied token or password.
    ///
    /// The endpoint stays valid for a fresh attempt.
    #[error("the server at {base_endpoint} rejected the supplied credentials")]
    InvalidCredentials {
        /// Endpoint that rejected the credentials.
        base_endpoint: BaseEndpoint,
    },

    /// The user declined to trust the server certificate.
    #[error("untrusted certificate presented by {base_endpoint} was declined")]
    UntrustedCertificateDeclined {
        /// Endpoint whose certificate was declined.
        base_endpoint: BaseEndpoint,
    },

    /// A transport-level error prevented the exchange.
    #[error("could not talk to {base_endpoint}: {reason}")]
    NetworkFailure {
        /// Endpoint that could not be reached.
        base_endpoint: BaseEndpoint,
        /// Transport error description.
        reason: String,
    },

    /// The caller or the user aborted the attempt.
    #[error("connection attempt cancelled")]
    Cancelled,

    /// The credential store refused the resolved server entry.
    #[error("could not store resolved server {base_endpoint}: {reason}")]
    Storage {
        /// Endpoint that was resolved.
        base_endpoint: BaseEndpoint,
        /// Store error description.
        reason: String,
    },
}

impl ConnectionFailure {
    /// Returns the failure discriminant.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedAddress(_) => FailureKind::MalformedAddress,
            Self::InvalidCredentials { .. } => FailureKind::InvalidCredentials,
            Self::UntrustedCertificateDeclined { .. } => FailureKind::UntrustedCertificateDeclined,
            Self::NetworkFailure { .. } => FailureKind::NetworkFailure,
            Self::Cancelled => FailureKind::Cancelled,
            Self::Storage { .. } => FailureKind::Storage,
        }
    }
}

/// Terminal artifact of one resolution attempt.
///
/// A handle is present if and only if the outcome is
/// [`ConnectionOutcome::Resolved`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionOutcome {
    /// The server was resolved and a handle issued.
    Resolved(ResolvedServer),
    /// The attempt ended without a handle.
    Failed(ConnectionFailure),
}

impl ConnectionOutcome {
    /// Returns whether the attempt resolved.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns the issued handle, if any.
    #[must_use]
    pub const fn handle(&self) -> Option<&ServerProviderHandle> {
        match self {
            Self::Resolved(resolved) => Some(resolved.handle()),
            Self::Failed(_) => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&ConnectionFailure> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Returns the failure discriminant, if any.
    #[must_use]
    pub const fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Resolved(_) => None,
            Self::Failed(failure) => Some(failure.kind()),
        }
    }
}

impl From<Result<ResolvedServer, ConnectionFailure>> for ConnectionOutcome {
    fn from(result: Result<ResolvedServer, ConnectionFailure>) -> Self {
        match result {
            Ok(resolved) => Self::Resolved(resolved),
            Err(failure) => Self::Failed(failure),
        }
    }
}
