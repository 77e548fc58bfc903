//! Interactive prompt port.

use crate::connection::domain::{BaseEndpoint, TrustDecision};
use async_trait::async_trait;
use secrecy::SecretString;

/// Answer to an interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply<T> {
    /// The user answered.
    Answered(T),
    /// The user closed the prompt without answering.
    Dismissed,
}

impl<T> PromptReply<T> {
    /// Returns the answer, if any.
    pub fn answered(self) -> Option<T> {
        match self {
            Self::Answered(value) => Some(value),
            Self::Dismissed => None,
        }
    }
}

/// Context shown when asking whether to trust a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustPromptReason {
    endpoint: BaseEndpoint,
    detail: String,
}

impl TrustPromptReason {
    /// Creates a trust prompt reason.
    #[must_use]
    pub fn new(endpoint: BaseEndpoint, detail: impl Into<String>) -> Self {
        Self {
            endpoint,
            detail: detail.into(),
        }
    }

    /// Returns the endpoint presenting the certificate.
    #[must_use]
    pub const fn endpoint(&self) -> &BaseEndpoint {
        &self.endpoint
    }

    /// Returns the transport's description of the verification failure.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// User interaction needed while resolving a server.
///
/// An empty password is a real answer, distinct from
/// [`PromptReply::Dismissed`].
#[async_trait]
pub trait ConnectionPrompt: Send + Sync {
    /// Asks for the password of `endpoint`.
    async fn request_password(&self, endpoint: &BaseEndpoint) -> PromptReply<SecretString>;

    /// Asks whether to proceed once despite an untrusted certificate.
    async fn request_trust_decision(
        &self,
        reason: &TrustPromptReason,
    ) -> PromptReply<TrustDecision>;
}
