//! Domain model for notebook server connection resolution.
//!
//! Everything here is pure: parsing raw addresses, deriving base endpoints,
//! classifying certificate trust and sequencing resolution phases. Network
//! access and user interaction stay behind the ports.

mod address;
mod command;
mod credentials;
mod endpoint;
mod error;
mod handle;
mod outcome;
mod phase;
mod trust;

pub use address::{NormalizedUri, RawAddress, Scheme};
pub use command::CommandDescriptor;
pub use credentials::{AuthMethod, Credentials};
pub use endpoint::{BaseEndpoint, BrowsingSuffix, KNOWN_BROWSING_SUFFIXES, TrailingSegments};
pub use error::{AddressError, PhaseTransitionError};
pub use handle::{ServerHandleId, ServerProviderHandle};
pub use outcome::{ConnectionFailure, ConnectionOutcome, FailureKind, ResolvedServer};
pub use phase::{ResolutionPhase, ResolutionTrail};
pub use trust::{CertificateStatus, TlsMode, TrustAction, TrustDecision, decide_trust};
