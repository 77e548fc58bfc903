//! Credential storage port.

use crate::connection::domain::{BaseEndpoint, ServerProviderHandle};
use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;

/// Result type for credential store operations.
pub type CredentialStoreResult<T> = Result<T, CredentialStoreError>;

/// What is remembered about a resolved server.
///
/// Passwords are never part of an entry.
#[derive(Debug, Clone)]
pub struct ServerEntry {
    base_endpoint: BaseEndpoint,
    token: Option<SecretString>,
    display_name: String,
}

impl ServerEntry {
    /// Creates a server entry.
    #[must_use]
    pub fn new(
        base_endpoint: BaseEndpoint,
        token: Option<SecretString>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            base_endpoint,
            token,
            display_name: display_name.into(),
        }
    }

    /// Returns the canonical base endpoint.
    #[must_use]
    pub const fn base_endpoint(&self) -> &BaseEndpoint {
        &self.base_endpoint
    }

    /// Returns the token supplied in the original address.
    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Write-only store for resolved servers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Records `entry` under `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialStoreError`] when the entry cannot be stored.
    async fn store(
        &self,
        handle: &ServerProviderHandle,
        entry: &ServerEntry,
    ) -> CredentialStoreResult<()>;
}

/// Errors returned by credential store implementations.
#[derive(Debug, Clone, Error)]
pub enum CredentialStoreError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CredentialStoreError {
    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
