//! In-memory credential store.

use crate::connection::{
    domain::{ServerHandleId, ServerProviderHandle},
    ports::{CredentialStore, CredentialStoreError, CredentialStoreResult, ServerEntry},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    state: Arc<RwLock<InMemoryStoreState>>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    entries: HashMap<ServerHandleId, (ServerProviderHandle, ServerEntry)>,
    reject_writes: bool,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that fails every write.
    #[must_use]
    pub fn rejecting_writes() -> Self {
        let store = Self::default();
        if let Ok(mut state) = store.state.write() {
            state.reject_writes = true;
        }
        store
    }

    /// Returns every stored handle with its entry.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn entries(&self) -> CredentialStoreResult<Vec<(ServerProviderHandle, ServerEntry)>> {
        let state = self.state.read().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.entries.values().cloned().collect())
    }

    /// Returns the entry stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn find(&self, id: ServerHandleId) -> CredentialStoreResult<Option<ServerEntry>> {
        let state = self.state.read().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.entries.get(&id).map(|(_, entry)| entry.clone()))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn store(
        &self,
        handle: &ServerProviderHandle,
        entry: &ServerEntry,
    ) -> CredentialStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            CredentialStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.reject_writes {
            return Err(CredentialStoreError::persistence(std::io::Error::other(
                "credential store is read-only",
            )));
        }
        state
            .entries
            .insert(handle.id(), (handle.clone(), entry.clone()));
        Ok(())
    }
}
