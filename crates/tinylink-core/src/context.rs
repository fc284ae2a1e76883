//! Per-request cancellation and deadline propagation.
//!
//! Every cache and store call receives a [`Context`]. Adapters run their I/O
//! through [`Context::run`], which drops the in-flight future as soon as the
//! caller cancels or the deadline passes. Dropping is what releases pooled
//! connections, so the same path covers success, failure and interruption.

use std::future::{pending, Future};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// The caller gave up on the request.
///
/// Kept apart from back-end failures so the transport can tell a client
/// disconnect or timeout from a broken cache or database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("cancelled by caller")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A cloneable request scope carrying an optional deadline and an optional
/// cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Triggers cancellation of every [`Context`] cloned from the one it was
/// created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context paired with a handle that cancels it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (sender, receiver) = watch::channel(false);
        let ctx = Self {
            deadline: None,
            cancel: Some(receiver),
        };
        let handle = CancelHandle {
            sender: Arc::new(sender),
        };
        (ctx, handle)
    }

    /// Bounds the context to `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bounds the context to `deadline`. An earlier existing deadline wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the interruption if the context is already cancelled or expired.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Err(Interrupted::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Interrupted::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drives `fut` to completion unless the context is interrupted first.
    ///
    /// On interruption `fut` is dropped without being polled again.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        self.check()?;

        tokio::select! {
            biased;
            () = self.cancelled() => Err(Interrupted::Cancelled),
            () = self.expired() => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }

    async fn cancelled(&self) {
        if let Some(receiver) = &self.cancel {
            let mut receiver = receiver.clone();
            let fired = receiver.wait_for(|cancelled| *cancelled).await.is_ok();
            if fired {
                return;
            }
        }
        // No signal, or every handle was dropped without cancelling.
        pending::<()>().await
    }

    async fn expired(&self) {
        match self.deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    }
}
