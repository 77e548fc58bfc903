//! In-memory adapter implementations for testing.
//!
//! These adapters are thread-safe and deterministic, so resolution flows can
//! be exercised without a live notebook server or a terminal.

mod naming;
mod prompt;
mod server;
mod storage;

pub use naming::FixedDisplayName;
pub use prompt::ScriptedPrompt;
pub use server::{InMemoryNotebookServer, RequestCounts};
pub use storage::InMemoryCredentialStore;
