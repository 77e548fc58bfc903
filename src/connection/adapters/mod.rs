//! Adapter implementations for the connection ports.
//!
//! The live client speaks HTTP to a notebook server; the console prompt
//! talks to a terminal. Deterministic doubles for tests live in [`memory`].

pub mod memory;

mod console;
mod http;
mod naming;

pub use console::ConsolePrompt;
pub use http::ReqwestNotebookServerApi;
pub use memory::{InMemoryNotebookServer, ScriptedPrompt};
pub use naming::HostDisplayName;
