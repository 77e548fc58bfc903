//! Provider handle issued on successful resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a [`ServerProviderHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerHandleId(Uuid);

impl ServerHandleId {
    /// Creates a new random handle identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a handle identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ServerHandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServerHandleId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Opaque reference to a resolved notebook server.
///
/// Created only when an attempt resolves and owned by the caller from then
/// on; the resolver keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerProviderHandle {
    id: ServerHandleId,
    extension_origin: String,
    label: String,
}

impl ServerProviderHandle {
    /// Issues a handle with a fresh identifier.
    #[must_use]
    pub fn new(extension_origin: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: ServerHandleId::new(),
            extension_origin: extension_origin.into(),
            label: label.into(),
        }
    }

    /// Returns the unique identifier.
    #[must_use]
    pub const fn id(&self) -> ServerHandleId {
        self.id
    }

    /// Returns the component that issued the handle.
    #[must_use]
    pub fn extension_origin(&self) -> &str {
        &self.extension_origin
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}
