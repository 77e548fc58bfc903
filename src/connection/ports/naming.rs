//! Server naming port.

use crate::connection::domain::BaseEndpoint;
use async_trait::async_trait;

/// Chooses the display name of a resolved server.
#[async_trait]
pub trait ServerNaming: Send + Sync {
    /// Returns the display name for `endpoint`.
    async fn resolve_display_name(&self, endpoint: &BaseEndpoint) -> String;
}
