//! Bounded retry with exponential backoff for lookup calls.

use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(5);

/// How often and how patiently a failing lookup is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Total number of calls per term, including the first. At least 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    /// Retries immediately. Used by tests and local lookup tables.
    pub fn without_backoff(self) -> Self {
        self.with_initial_backoff(Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given failed attempt (1-based): the initial backoff
    /// doubled per attempt, capped at the maximum.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Runs `call` until it succeeds, fails with a non-retryable error, or
    /// the attempts are used up. Returns the last error in the latter cases.
    pub fn run<T>(&self, term: &str, mut call: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= self.max_attempts => {
                    warn!(term = %term, attempts = attempt, error = %err, "lookup attempts exhausted");
                    return Err(err);
                }
                Err(err) => {
                    let delay = self.backoff_for(attempt);
                    debug!(
                        term = %term,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "retrying lookup"
                    );
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::LookupError;

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(2000));
        assert_eq!(policy.backoff_for(5), Duration::from_secs(5));
        assert_eq!(policy.backoff_for(64), Duration::from_secs(5));
    }

    #[test]
    fn retries_transient_errors_up_to_limit() {
        let policy = RetryPolicy::default().with_max_attempts(4).without_backoff();
        let calls = Cell::new(0);
        let result: Result<()> = policy.run("term", || {
            calls.set(calls.get() + 1);
            Err(LookupError::Network("reset".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn stops_on_permanent_error() {
        let policy = RetryPolicy::default().without_backoff();
        let calls = Cell::new(0);
        let result: Result<()> = policy.run("term", || {
            calls.set(calls.get() + 1);
            Err(LookupError::InvalidResponse("bad json".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn recovers_after_transient_error() {
        let policy = RetryPolicy::default().without_backoff();
        let calls = Cell::new(0);
        let result = policy.run("term", || {
            calls.set(calls.get() + 1);
            if calls.get() < 2 {
                Err(LookupError::RateLimited)
            } else {
                Ok(7)
            }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn at_least_one_attempt() {
        assert_eq!(RetryPolicy::default().with_max_attempts(0).max_attempts(), 1);
    }
}
