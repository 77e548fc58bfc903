//! Actionable command descriptors for command surfaces.

use super::{BaseEndpoint, RawAddress};

/// A command a command palette can offer for an address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandDescriptor {
    label: String,
    address: RawAddress,
}

impl CommandDescriptor {
    /// Describes connecting to `address`, labelled by its base endpoint so
    /// embedded tokens never show up in the label.
    #[must_use]
    pub fn connect(address: RawAddress, base_endpoint: &BaseEndpoint) -> Self {
        Self {
            label: format!("Connect to {base_endpoint}"),
            address,
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the address the command resolves.
    #[must_use]
    pub const fn address(&self) -> &RawAddress {
        &self.address
    }
}
