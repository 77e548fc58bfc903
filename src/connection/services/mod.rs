//! Application services for connection resolution.

mod cancellation;
mod config;
mod negotiator;
mod resolver;
mod trust_gate;

pub use cancellation::{Cancelled, until_cancelled};
pub use config::{ConfigError, ResolverConfig};
pub use negotiator::{CredentialNegotiator, NegotiationError};
pub use resolver::{ConnectionResolver, ResolutionReport};
pub use trust_gate::{TrustGate, TrustGateError};
