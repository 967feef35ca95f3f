// crates/openapi-conformance-core/src/runtime/waiter.rs
// ============================================================================
// Module: Publication Waiter
// Description: Bounded polling for a group-version to become discoverable.
// Purpose: Assert eventual publication without unbounded hangs.
// Dependencies: thiserror, tokio, tracing, crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Publication of a newly registered group-version lags the registration
//! event, so the waiter polls on a fixed interval until the document appears
//! or the deadline elapses.
//!
//! Outcomes are kept distinct:
//! - `NotFound` means "not yet" and is retried.
//! - Any transport error ends the wait immediately; it is not evidence of a
//!   pending publication.
//! - The deadline yields [`WaitError::Timeout`] with the wait parameters.
//! - Cancellation ends the wait within one poll interval.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio::time::sleep_until;
use tokio::time::timeout_at;
use tracing::debug;
use tracing::info;

use crate::core::Document;
use crate::core::GroupVersion;
use crate::core::Verdict;
use crate::interfaces::DiscoveryError;
use crate::interfaces::DiscoverySource;
use crate::runtime::cancel::CancelSignal;

// ============================================================================
// SECTION: Poll Policy
// ============================================================================

/// Poll policy validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollPolicyError {
    /// The poll interval is zero.
    #[error("poll interval must be greater than zero")]
    ZeroInterval,
    /// The deadline is zero.
    #[error("poll deadline must be greater than zero")]
    ZeroDeadline,
    /// The interval exceeds the deadline.
    #[error("poll interval ({interval_ms} ms) exceeds deadline ({deadline_ms} ms)")]
    IntervalExceedsDeadline {
        /// Interval in milliseconds.
        interval_ms: u128,
        /// Deadline in milliseconds.
        deadline_ms: u128,
    },
}

/// Interval and deadline for a publication wait.
///
/// # Invariants
/// - `0 < interval <= deadline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between attempts.
    interval: Duration,
    /// Total time budget measured from the first attempt.
    deadline: Duration,
}

impl PollPolicy {
    /// Creates a validated poll policy.
    ///
    /// # Errors
    ///
    /// Returns [`PollPolicyError`] when either duration is zero or the
    /// interval exceeds the deadline.
    pub fn new(interval: Duration, deadline: Duration) -> Result<Self, PollPolicyError> {
        if interval.is_zero() {
            return Err(PollPolicyError::ZeroInterval);
        }
        if deadline.is_zero() {
            return Err(PollPolicyError::ZeroDeadline);
        }
        if interval > deadline {
            return Err(PollPolicyError::IntervalExceedsDeadline {
                interval_ms: interval.as_millis(),
                deadline_ms: deadline.as_millis(),
            });
        }
        Ok(Self {
            interval,
            deadline,
        })
    }

    /// Returns the poll interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// A document observed by the waiter.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    /// The published document.
    pub document: Document,
    /// Number of fetch attempts, including the successful one.
    pub attempts: u32,
    /// Time from the first attempt to the successful fetch.
    pub elapsed: Duration,
}

/// Terminal failures of a publication wait.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The deadline elapsed without the group-version being published.
    #[error(
        "{target} not published after {} ms ({attempts} attempts at {} ms interval)",
        .waited.as_millis(),
        .interval.as_millis()
    )]
    Timeout {
        /// Awaited group-version.
        target: GroupVersion,
        /// Time spent waiting.
        waited: Duration,
        /// Poll interval in effect.
        interval: Duration,
        /// Number of fetch attempts.
        attempts: u32,
    },
    /// A non-retryable discovery error ended the wait.
    #[error("transport error awaiting {target} on attempt {attempts}: {cause}")]
    Transport {
        /// Awaited group-version.
        target: GroupVersion,
        /// Attempt that failed.
        attempts: u32,
        /// Underlying error description.
        cause: String,
    },
    /// The caller cancelled the wait.
    #[error("wait for {target} cancelled after {attempts} attempts")]
    Cancelled {
        /// Awaited group-version.
        target: GroupVersion,
        /// Number of fetch attempts made.
        attempts: u32,
    },
}

impl WaitError {
    /// Converts the failure into a verdict; cancellation has none.
    #[must_use]
    pub fn into_verdict(self) -> Option<Verdict> {
        match self {
            Self::Timeout {
                waited,
                interval,
                attempts,
                ..
            } => Some(Verdict::Timeout {
                waited,
                interval,
                attempts,
            }),
            Self::Transport {
                cause,
                ..
            } => Some(Verdict::TransportError {
                cause,
            }),
            Self::Cancelled {
                ..
            } => None,
        }
    }
}

// ============================================================================
// SECTION: Waiter
// ============================================================================

/// Polls a discovery source until a group-version is published.
///
/// # Invariants
/// - Never reports a timeout before the deadline has elapsed.
/// - Never sleeps past the deadline; a fetch in flight at the deadline is abandoned.
#[derive(Debug, Clone)]
pub struct PublicationWaiter {
    /// Interval and deadline.
    policy: PollPolicy,
    /// External cancellation signal.
    cancel: CancelSignal,
}

impl PublicationWaiter {
    /// Creates a waiter that can only end by publication, error, or deadline.
    #[must_use]
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            cancel: CancelSignal::never(),
        }
    }

    /// Attaches an external cancellation signal.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns the poll policy.
    #[must_use]
    pub const fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Waits until `target` is published by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError::Timeout`] when the deadline elapses,
    /// [`WaitError::Transport`] on the first non-retryable discovery error,
    /// and [`WaitError::Cancelled`] when the cancellation signal fires.
    pub async fn await_publication<S>(
        &self,
        source: &S,
        target: &GroupVersion,
    ) -> Result<Publication, WaitError>
    where
        S: DiscoverySource + ?Sized,
    {
        let started = Instant::now();
        let deadline_at = started + self.policy.deadline;
        let mut cancel = self.cancel.clone();
        let mut attempts: u32 = 0;
        loop {
            if cancel.is_cancelled() {
                return Err(self.cancelled(target, attempts));
            }
            attempts = attempts.saturating_add(1);
            let fetched = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(self.cancelled(target, attempts)),
                fetched = timeout_at(deadline_at, source.fetch_document(target)) => fetched,
            };
            match fetched {
                Err(_elapsed) => return Err(self.timed_out(target, started, attempts)),
                Ok(Ok(document)) => {
                    let elapsed = started.elapsed();
                    info!(
                        group_version = %target,
                        attempts,
                        elapsed_ms = duration_millis(elapsed),
                        "group-version published"
                    );
                    return Ok(Publication {
                        document,
                        attempts,
                        elapsed,
                    });
                }
                Ok(Err(DiscoveryError::NotFound(_))) => {
                    debug!(group_version = %target, attempts, "group-version not yet published");
                }
                Ok(Err(err)) => {
                    return Err(WaitError::Transport {
                        target: target.clone(),
                        attempts,
                        cause: err.to_string(),
                    });
                }
            }

            let now = Instant::now();
            if now >= deadline_at {
                return Err(self.timed_out(target, started, attempts));
            }
            let wake_at = std::cmp::min(now + self.policy.interval, deadline_at);
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(self.cancelled(target, attempts)),
                () = sleep_until(wake_at) => {}
            }
        }
    }

    /// Builds the timeout error for the current wait.
    fn timed_out(&self, target: &GroupVersion, started: Instant, attempts: u32) -> WaitError {
        WaitError::Timeout {
            target: target.clone(),
            waited: started.elapsed(),
            interval: self.policy.interval,
            attempts,
        }
    }

    /// Builds the cancellation error for the current wait.
    fn cancelled(&self, target: &GroupVersion, attempts: u32) -> WaitError {
        debug!(group_version = %target, attempts, "publication wait cancelled");
        WaitError::Cancelled {
            target: target.clone(),
            attempts,
        }
    }
}

/// Converts a duration to whole milliseconds for log fields.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
