//! Resolver configuration.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Errors returned while loading a [`ResolverConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for this schema.
    #[error("invalid resolver configuration: {0}")]
    Parse(String),

    /// The extension origin is empty after trimming.
    #[error("extension origin must not be empty")]
    EmptyExtensionOrigin,

    /// The request timeout is zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings shared by every resolution attempt.
///
/// # Examples
///
/// ```
/// use nbconnect::connection::services::ResolverConfig;
///
/// let config = ResolverConfig::default();
/// assert!(!config.allow_unauthorized_connections);
///
/// let permissive = ResolverConfig::permissive();
/// assert!(permissive.allow_unauthorized_connections);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Accept untrusted certificates without asking.
    pub allow_unauthorized_connections: bool,
    /// Origin stamped on every issued handle.
    pub extension_origin: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            allow_unauthorized_connections: false,
            extension_origin: "nbconnect".to_owned(),
            request_timeout_secs: 30,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration that accepts untrusted certificates.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            allow_unauthorized_connections: true,
            ..Default::default()
        }
    }

    /// Loads a configuration from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document does not parse or fails
    /// validation.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(document).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces the extension origin.
    #[must_use]
    pub fn with_extension_origin(mut self, origin: impl Into<String>) -> Self {
        self.extension_origin = origin.into().trim().to_owned();
        self
    }

    /// Checks the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyExtensionOrigin`] or
    /// [`ConfigError::ZeroTimeout`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension_origin.trim().is_empty() {
            return Err(ConfigError::EmptyExtensionOrigin);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ResolverConfig::from_json_str("{}").expect("empty object should parse");

        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn document_overrides_policy_flag() {
        let config =
            ResolverConfig::from_json_str(r#"{"allow_unauthorized_connections": true}"#)
                .expect("document should parse");

        assert!(config.allow_unauthorized_connections);
        assert_eq!(config.extension_origin, "nbconnect");
    }

    #[rstest]
    #[case(r#"{"extension_origin": "  "}"#, ConfigError::EmptyExtensionOrigin)]
    #[case(r#"{"request_timeout_secs": 0}"#, ConfigError::ZeroTimeout)]
    fn invalid_values_are_rejected(#[case] document: &str, #[case] expected: ConfigError) {
        assert_eq!(ResolverConfig::from_json_str(document), Err(expected));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = ResolverConfig::from_json_str(r#"{"skip_tls": true}"#);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
