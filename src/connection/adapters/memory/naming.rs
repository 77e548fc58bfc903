//! Fixed display naming.

use crate::connection::{domain::BaseEndpoint, ports::ServerNaming};
use async_trait::async_trait;

/// Names every server with the same label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDisplayName(String);

impl FixedDisplayName {
    /// Creates a naming adapter returning `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

#[async_trait]
impl ServerNaming for FixedDisplayName {
    async fn resolve_display_name(&self, _endpoint: &BaseEndpoint) -> String {
        self.0.clone()
    }
}
