//! Resolution phases and the attempt-local phase trail.

use super::{FailureKind, PhaseTransitionError};
use std::fmt;

/// Phase of a single resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionPhase {
    /// The attempt has received its address and cancellation signal.
    Start,
    /// The raw address is being parsed.
    Normalizing,
    /// The base endpoint is being derived.
    ResolvingEndpoint,
    /// Credentials are being negotiated with the server.
    Negotiating,
    /// An untrusted certificate awaits a trust decision.
    TrustGating,
    /// A handle was issued.
    Succeeded,
    /// The attempt ended without a handle.
    Failed(FailureKind),
}

impl ResolutionPhase {
    /// Returns the canonical snake-case name, without the failure kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Normalizing => "normalizing",
            Self::ResolvingEndpoint => "resolving_endpoint",
            Self::Negotiating => "negotiating",
            Self::TrustGating => "trust_gating",
            Self::Succeeded => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    /// Returns whether the attempt ends in this phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    /// Returns whether moving to `target` keeps the attempt strictly
    /// sequential.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Start, Self::Normalizing)
                | (Self::Normalizing, Self::ResolvingEndpoint)
                | (Self::ResolvingEndpoint, Self::Negotiating)
                | (Self::Negotiating, Self::TrustGating | Self::Succeeded)
                | (Self::TrustGating, Self::Succeeded)
                | (
                    Self::Start
                        | Self::Normalizing
                        | Self::ResolvingEndpoint
                        | Self::Negotiating
                        | Self::TrustGating,
                    Self::Failed(_)
                )
        )
    }
}

impl fmt::Display for ResolutionPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(kind) => write!(formatter, "failed({kind})"),
            other => formatter.write_str(other.as_str()),
        }
    }
}

/// Ordered record of the phases one attempt went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTrail {
    phases: Vec<ResolutionPhase>,
}

impl ResolutionTrail {
    /// Starts a trail in [`ResolutionPhase::Start`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            phases: vec![ResolutionPhase::Start],
        }
    }

    /// Returns the phase the attempt is in.
    #[must_use]
    pub fn current(&self) -> ResolutionPhase {
        self.phases
            .last()
            .copied()
            .unwrap_or(ResolutionPhase::Start)
    }

    /// Moves the attempt to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseTransitionError`] when `next` is not reachable from the
    /// current phase; the trail is left unchanged.
    pub fn advance(&mut self, next: ResolutionPhase) -> Result<(), PhaseTransitionError> {
        let current = self.current();
        if !current.can_transition_to(next) {
            return Err(PhaseTransitionError {
                from: current,
                to: next,
            });
        }
        self.phases.push(next);
        Ok(())
    }

    /// Returns whether the attempt passed through `phase`.
    #[must_use]
    pub fn visited(&self, phase: ResolutionPhase) -> bool {
        self.phases.contains(&phase)
    }

    /// Returns all visited phases in order.
    #[must_use]
    pub fn phases(&self) -> &[ResolutionPhase] {
        &self.phases
    }
}

impl Default for ResolutionTrail {
    fn default() -> Self {
        Self::new()
    }
}
