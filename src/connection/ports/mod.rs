//! Port contracts for connection resolution.

mod naming;
mod prompt;
mod server_api;
mod storage;

pub use naming::ServerNaming;
pub use prompt::{ConnectionPrompt, PromptReply, TrustPromptReason};
pub use server_api::{
    LoginResult, NotebookServerApi, ServerApiError, ServerApiResult, ServerProbe,
};
pub use storage::{CredentialStore, CredentialStoreError, CredentialStoreResult, ServerEntry};

#[cfg(test)]
pub use server_api::MockNotebookServerApi;
