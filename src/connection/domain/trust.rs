//! Certificate trust decisioning.

use super::Scheme;

/// Whether the certificate chain presented by a server verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CertificateStatus {
    /// The chain leads to a trusted root.
    Trusted,
    /// The chain does not lead to a trusted root (commonly self-signed).
    Untrusted,
}

/// What to do about a server's certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustAction {
    /// Keep verifying certificates; no decision is needed.
    Proceed,
    /// Skip verification for this attempt without asking.
    AcceptForAttempt,
    /// Ask the user whether to proceed once.
    AskUser,
}

/// Answer to a trust prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrustDecision {
    /// Proceed for this attempt only.
    Accept,
    /// Abandon the attempt.
    Decline,
}

/// Certificate verification mode for requests of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TlsMode {
    /// Reject certificates that do not chain to a trusted root.
    #[default]
    Verify,
    /// Accept any certificate; only used after a trust decision.
    AcceptInvalidCertificates,
}

/// Decides how to treat a server certificate.
///
/// Plain HTTP and verified chains need no decision. An untrusted chain is
/// accepted silently when `allow_unauthorized` is set and otherwise needs
/// the user's answer.
#[must_use]
pub const fn decide_trust(
    scheme: Scheme,
    status: CertificateStatus,
    allow_unauthorized: bool,
) -> TrustAction {
    match (scheme, status) {
        (Scheme::Http, _) | (Scheme::Https, CertificateStatus::Trusted) => TrustAction::Proceed,
        (Scheme::Https, CertificateStatus::Untrusted) if allow_unauthorized => {
            TrustAction::AcceptForAttempt
        }
        (Scheme::Https, CertificateStatus::Untrusted) => TrustAction::AskUser,
    }
}
