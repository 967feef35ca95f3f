// crates/openapi-conformance-core/src/runtime/cancel.rs
// ============================================================================
// Module: Cancellation
// Description: Cooperative cancellation signal for long-running waits.
// Purpose: Let callers stop a poll loop promptly from outside.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! A [`CancelHandle`] flips a shared flag observed by any number of
//! [`CancelSignal`] clones. Cancellation is sticky: once requested, every
//! current and future wait on the signal completes immediately.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future;

use tokio::sync::watch;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Requests cancellation of every associated [`CancelSignal`].
#[derive(Debug)]
pub struct CancelHandle {
    /// Shared cancellation flag.
    sender: watch::Sender<bool>,
}

/// Observes cancellation requested through a [`CancelHandle`].
#[derive(Debug, Clone)]
pub struct CancelSignal {
    /// Shared cancellation flag.
    receiver: watch::Receiver<bool>,
}

/// Creates a connected cancellation handle and signal.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancelHandle {
            sender,
        },
        CancelSignal {
            receiver,
        },
    )
}

impl CancelHandle {
    /// Requests cancellation.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl CancelSignal {
    /// Returns a signal that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self {
            receiver,
        }
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes when cancellation is requested; pends forever otherwise.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.receiver.borrow_and_update() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                // Handle dropped without cancelling.
                future::pending::<()>().await;
            }
        }
    }
}
