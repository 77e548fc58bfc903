//! Racing suspend points against a cancellation signal.

use crate::connection::domain::ConnectionFailure;
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The cancellation signal fired before the awaited value arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

impl From<Cancelled> for ConnectionFailure {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Awaits `operation` unless `cancel` fires first.
///
/// The signal is polled first, so an already-fired signal always wins. The
/// abandoned operation is dropped, not aborted at the transport level.
///
/// # Errors
///
/// Returns [`Cancelled`] when the signal fires first.
pub async fn until_cancelled<F>(
    cancel: &CancellationToken,
    operation: F,
) -> Result<F::Output, Cancelled>
where
    F: Future,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(Cancelled),
        output = operation => Ok(output),
    }
}
