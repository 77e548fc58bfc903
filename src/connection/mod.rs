//! Notebook server connection resolution and authentication negotiation.
//!
//! This module turns a user-supplied notebook server address into an
//! authenticated connection handle: it normalizes the address, derives the
//! canonical base endpoint, negotiates token or password credentials with
//! the live server and gates untrusted TLS certificates behind an explicit
//! trust decision. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
