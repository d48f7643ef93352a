//! Per-request deadline token
//!
//! One [`Deadline`] is created when a request starts and passed down to every
//! stage. Futures run through [`Deadline::run`] are dropped when the deadline
//! passes, which cancels any in-flight I/O they own.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Furthest point ahead an instant is placed; longer timeouts are clamped to it
pub const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `timeout` from now, clamped to [`FAR_FUTURE`]
pub fn instant_after(timeout: Duration) -> Instant {
    Instant::now() + timeout.min(FAR_FUTURE)
}

/// The deadline passed before the future completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Deadline exceeded")]
pub struct DeadlineExceeded;

/// Absolute point in time by which a request must finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: instant_after(timeout),
        }
    }

    /// Deadline at an absolute instant
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// The instant this deadline expires
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left, zero once expired
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// The earlier of this deadline and `timeout` from now
    pub fn capped(&self, timeout: Duration) -> Self {
        Self {
            at: self.at.min(instant_after(timeout)),
        }
    }

    /// Run `fut`, dropping it if the deadline passes first
    pub async fn run<F, T>(&self, fut: F) -> Result<T, DeadlineExceeded>
    where
        F: Future<Output = T>,
    {
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| DeadlineExceeded)
    }
}
