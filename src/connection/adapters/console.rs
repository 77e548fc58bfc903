//! Line-oriented interactive prompt.

use crate::connection::{
    domain::{BaseEndpoint, TrustDecision},
    ports::{ConnectionPrompt, PromptReply, TrustPromptReason},
};
use async_trait::async_trait;
use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};
use tokio::sync::Mutex;
use tracing::debug;

/// Prompt over an async line reader and writer, typically stdin and stderr.
///
/// End of input dismisses the prompt. Input is not masked.
#[derive(Debug)]
pub struct ConsolePrompt<R, W> {
    reader: Mutex<R>,
    writer: Mutex<W>,
}

impl<R, W> ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a prompt reading answers from `reader` and writing questions
    /// to `writer`.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(reader),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer.into_inner())
    }

    async fn ask(&self, question: &str) -> PromptReply<String> {
        if let Err(err) = write_question(&mut *self.writer.lock().await, question).await {
            debug!(error = %err, "prompt output failed; dismissing");
            return PromptReply::Dismissed;
        }

        let mut line = String::new();
        match self.reader.lock().await.read_line(&mut line).await {
            Ok(0) => PromptReply::Dismissed,
            Ok(_) => PromptReply::Answered(line.trim_end_matches(['\r', '\n']).to_owned()),
            Err(err) => {
                debug!(error = %err, "prompt input failed; dismissing");
                PromptReply::Dismissed
            }
        }
    }
}

#[async_trait]
impl<R, W> ConnectionPrompt for ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn request_password(&self, endpoint: &BaseEndpoint) -> PromptReply<SecretString> {
        match self.ask(&format!("Password for {endpoint}: ")).await {
            PromptReply::Answered(password) => PromptReply::Answered(SecretString::from(password)),
            PromptReply::Dismissed => PromptReply::Dismissed,
        }
    }

    async fn request_trust_decision(
        &self,
        reason: &TrustPromptReason,
    ) -> PromptReply<TrustDecision> {
        let question = format!(
            "The certificate of {} is not trusted ({}).\nConnect anyway? [y/N]: ",
            reason.endpoint(),
            reason.detail()
        );
        match self.ask(&question).await {
            PromptReply::Answered(answer) => PromptReply::Answered(parse_trust_answer(&answer)),
            PromptReply::Dismissed => PromptReply::Dismissed,
        }
    }
}

async fn write_question<W>(writer: &mut W, question: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(question.as_bytes()).await?;
    writer.flush().await
}

fn parse_trust_answer(answer: &str) -> TrustDecision {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => TrustDecision::Accept,
        _ => TrustDecision::Decline,
    }
}
