// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded retry with exponential backoff.
//!
//! Retries are for transient faults only. Callers decide which errors are
//! retryable before wrapping an operation; this module never inspects the
//! error beyond logging it.

use std::fmt::Display;
use std::time::Duration;

use tracing::warn;

/// Attempt budget and backoff base for one class of operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub max_attempts: u32,
    /// Delay after the first failure; doubles after each subsequent one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay to sleep after failed attempt number `attempt` (1-based):
    /// `base * 2^(attempt-1)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_secs(1))
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping the backoff delay
/// between attempts. The last error is returned unchanged when the budget is
/// exhausted.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts => {
                let delay = policy.backoff_delay(attempt);
                warn!(
                    operation = label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(
                    operation = label,
                    attempts = policy.max_attempts,
                    error = %err,
                    "attempt budget exhausted"
                );
                return Err(err);
            }
        }
    }
}
