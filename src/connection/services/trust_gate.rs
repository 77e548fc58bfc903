//! Trust decisions for untrusted server certificates.

use super::cancellation::{Cancelled, until_cancelled};
use crate::connection::{
    domain::{
        BaseEndpoint, CertificateStatus, ConnectionFailure, TlsMode, TrustAction, TrustDecision,
        decide_trust,
    },
    ports::{ConnectionPrompt, PromptReply, TrustPromptReason},
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Reasons the gate refused to let an attempt continue.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TrustGateError {
    /// The user declined to trust the certificate.
    #[error("untrusted certificate declined")]
    Declined,

    /// The cancellation signal fired or the prompt was dismissed.
    #[error("trust decision cancelled")]
    Cancelled,
}

impl TrustGateError {
    /// Converts the error into the terminal failure for `endpoint`.
    #[must_use]
    pub fn into_failure(self, endpoint: &BaseEndpoint) -> ConnectionFailure {
        match self {
            Self::Declined => ConnectionFailure::UntrustedCertificateDeclined {
                base_endpoint: endpoint.clone(),
            },
            Self::Cancelled => ConnectionFailure::Cancelled,
        }
    }
}

impl From<Cancelled> for TrustGateError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Applies the global policy and, when needed, asks the user.
///
/// An acceptance covers the in-flight attempt only.
pub struct TrustGate<P>
where
    P: ConnectionPrompt,
{
    prompt: Arc<P>,
    allow_unauthorized: bool,
}

impl<P> TrustGate<P>
where
    P: ConnectionPrompt,
{
    /// Creates a gate; `allow_unauthorized` suppresses the prompt.
    #[must_use]
    pub const fn new(prompt: Arc<P>, allow_unauthorized: bool) -> Self {
        Self {
            prompt,
            allow_unauthorized,
        }
    }

    /// Returns the TLS mode the rest of the attempt must use.
    ///
    /// # Errors
    ///
    /// Returns [`TrustGateError::Declined`] when the user declines and
    /// [`TrustGateError::Cancelled`] when the prompt is dismissed or
    /// `cancel` fires first.
    pub async fn evaluate(
        &self,
        endpoint: &BaseEndpoint,
        status: CertificateStatus,
        detail: &str,
        cancel: &CancellationToken,
    ) -> Result<TlsMode, TrustGateError> {
        match decide_trust(endpoint.scheme(), status, self.allow_unauthorized) {
            TrustAction::Proceed => Ok(TlsMode::Verify),
            TrustAction::AcceptForAttempt => {
                info!(endpoint = %endpoint, "accepting untrusted certificate by policy");
                Ok(TlsMode::AcceptInvalidCertificates)
            }
            TrustAction::AskUser => {
                let reason = TrustPromptReason::new(endpoint.clone(), detail);
                match until_cancelled(cancel, self.prompt.request_trust_decision(&reason)).await? {
                    PromptReply::Answered(TrustDecision::Accept) => {
                        info!(endpoint = %endpoint, "untrusted certificate accepted for this attempt");
                        Ok(TlsMode::AcceptInvalidCertificates)
                    }
                    PromptReply::Answered(TrustDecision::Decline) => Err(TrustGateError::Declined),
                    PromptReply::Dismissed => Err(TrustGateError::Cancelled),
                }
            }
        }
    }
}
