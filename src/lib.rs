//! nbconnect: notebook server connection resolution.
//!
//! This crate turns an address typed or pasted by a user into an
//! authenticated handle for a remote notebook server. It normalizes the
//! address, derives the server's canonical base endpoint, negotiates token
//! or password credentials, and gates untrusted TLS certificates behind an
//! explicit trust decision.
//!
//! # Architecture
//!
//! nbconnect follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types and decision functions
//! - **Ports**: Abstract trait interfaces for the server, prompt, naming and
//!   storage collaborators
//! - **Adapters**: Concrete implementations of ports (HTTP client, console
//!   prompt, in-memory doubles)
//!
//! # Modules
//!
//! - [`connection`]: Address resolution, credential negotiation and the
//!   connection orchestrator

pub mod connection;
