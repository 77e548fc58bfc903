//! Error types for address parsing and phase sequencing.

use super::ResolutionPhase;
use thiserror::Error;

/// Errors returned while normalizing a raw notebook server address.
///
/// Messages never echo the raw input because it may embed a token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The address is empty after trimming.
    #[error("notebook server address must not be empty")]
    Empty,

    /// The address could not be parsed as a URL.
    #[error("notebook server address is not a valid URL: {0}")]
    Unparseable(String),

    /// The address uses a scheme other than `http` or `https`.
    #[error("unsupported scheme '{0}' (only 'http' and 'https' are allowed)")]
    UnsupportedScheme(String),

    /// The address has no host component.
    #[error("notebook server address has no host")]
    MissingHost,
}

/// Error returned when a resolution attempt tries an out-of-order phase.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid resolution phase transition: {from} -> {to}")]
pub struct PhaseTransitionError {
    /// Phase the attempt was in.
    pub from: ResolutionPhase,
    /// Phase that was requested.
    pub to: ResolutionPhase,
}
