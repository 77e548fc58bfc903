//! Display naming derived from the endpoint.

use crate::connection::{domain::BaseEndpoint, ports::ServerNaming};
use async_trait::async_trait;

/// Names a server after its host, adding the port when one is explicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostDisplayName;

#[async_trait]
impl ServerNaming for HostDisplayName {
    async fn resolve_display_name(&self, endpoint: &BaseEndpoint) -> String {
        endpoint.host_label()
    }
}
