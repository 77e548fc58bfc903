//! Scripted prompt for tests and non-interactive callers.

use crate::connection::{
    domain::{BaseEndpoint, TrustDecision},
    ports::{ConnectionPrompt, PromptReply, TrustPromptReason},
};
use async_trait::async_trait;
use secrecy::SecretString;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Prompt answering from queued replies.
///
/// An exhausted queue answers [`PromptReply::Dismissed`]. A held prompt
/// waits for [`ScriptedPrompt::release`] before answering, which keeps an
/// attempt suspended at the prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompt {
    script: Arc<Mutex<PromptScript>>,
    asked: Arc<Notify>,
    hold: Option<Arc<Notify>>,
}

#[derive(Debug, Default)]
struct PromptScript {
    passwords: VecDeque<PromptReply<SecretString>>,
    trust_decisions: VecDeque<PromptReply<TrustDecision>>,
    password_requests: usize,
    trust_requests: usize,
}

impl ScriptedPrompt {
    /// Creates a prompt that dismisses every request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a password answer.
    #[must_use]
    pub fn with_password(self, password: impl Into<String>) -> Self {
        self.queue_password(PromptReply::Answered(SecretString::from(password.into())))
    }

    /// Queues a dismissed password prompt.
    #[must_use]
    pub fn with_dismissed_password(self) -> Self {
        self.queue_password(PromptReply::Dismissed)
    }

    /// Queues a trust decision.
    #[must_use]
    pub fn with_trust_decision(self, decision: TrustDecision) -> Self {
        self.queue_trust(PromptReply::Answered(decision))
    }

    /// Queues a dismissed trust prompt.
    #[must_use]
    pub fn with_dismissed_trust_decision(self) -> Self {
        self.queue_trust(PromptReply::Dismissed)
    }

    /// Holds every request until [`ScriptedPrompt::release`] is called.
    #[must_use]
    pub fn held(mut self) -> Self {
        self.hold = Some(Arc::new(Notify::new()));
        self
    }

    /// Lets one held request answer.
    pub fn release(&self) {
        if let Some(hold) = &self.hold {
            hold.notify_one();
        }
    }

    /// Waits until a request reaches the prompt.
    pub async fn wait_until_asked(&self) {
        self.asked.notified().await;
    }

    /// Returns how many passwords were requested.
    #[must_use]
    pub fn password_requests(&self) -> usize {
        self.script
            .lock()
            .map_or(0, |script| script.password_requests)
    }

    /// Returns how many trust decisions were requested.
    #[must_use]
    pub fn trust_requests(&self) -> usize {
        self.script.lock().map_or(0, |script| script.trust_requests)
    }

    fn queue_password(self, reply: PromptReply<SecretString>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.passwords.push_back(reply);
        }
        self
    }

    fn queue_trust(self, reply: PromptReply<TrustDecision>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.trust_decisions.push_back(reply);
        }
        self
    }

    async fn wait_for_release(&self) {
        self.asked.notify_one();
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
    }
}

#[async_trait]
impl ConnectionPrompt for ScriptedPrompt {
    async fn request_password(&self, _endpoint: &BaseEndpoint) -> PromptReply<SecretString> {
        if let Ok(mut script) = self.script.lock() {
            script.password_requests += 1;
        }
        self.wait_for_release().await;
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.passwords.pop_front())
            .unwrap_or(PromptReply::Dismissed)
    }

    async fn request_trust_decision(
        &self,
        _reason: &TrustPromptReason,
    ) -> PromptReply<TrustDecision> {
        if let Ok(mut script) = self.script.lock() {
            script.trust_requests += 1;
        }
        self.wait_for_release().await;
        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.trust_decisions.pop_front())
            .unwrap_or(PromptReply::Dismissed)
    }
}
