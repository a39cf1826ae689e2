//! Retry policy and per-record retry state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Total number of update attempts per record (including the first).
pub const MAX_RETRIES: u32 = 3;

/// Base unit of the linear backoff.
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Linear backoff: the n-th rate-limited attempt waits `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum attempts per record, including the first one.
    pub max_attempts: u32,

    /// Base delay multiplied by the attempt number.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay before the attempt that follows the `attempt`-th rate limit (1-indexed).
    ///
    /// base=1s: attempt 1 -> 1s, attempt 2 -> 2s, attempt 3 -> 3s
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.max(1))
    }
}

/// What to do after a rate-limited attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait, then attempt again.
    BackOff { attempt: u32, delay: Duration },

    /// No attempts left.
    Exhausted,
}

/// Attempt counter for one record's update lifecycle.
///
/// Created fresh for every record and dropped once the update resolves, so
/// nothing is shared between concurrent updates.
#[derive(Debug, Clone, Copy)]
pub struct RetryState {
    policy: RetryPolicy,
    attempts: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    /// Attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Count one more attempt; returns its 1-indexed number.
    pub fn begin_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    /// Decide what follows a rate-limited attempt.
    pub fn on_rate_limited(&self) -> RetryDecision {
        if self.attempts >= self.policy.max_attempts {
            RetryDecision::Exhausted
        } else {
            RetryDecision::BackOff {
                attempt: self.attempts,
                delay: self.policy.delay_for(self.attempts),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_constants() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn linear_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(3));
        // attempt 0 is treated like the first one
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    }

    #[test]
    fn state_backs_off_until_exhausted() {
        let mut state = RetryState::new(RetryPolicy::default());

        assert_eq!(state.begin_attempt(), 1);
        assert_eq!(
            state.on_rate_limited(),
            RetryDecision::BackOff {
                attempt: 1,
                delay: Duration::from_secs(1)
            }
        );

        assert_eq!(state.begin_attempt(), 2);
        assert_eq!(
            state.on_rate_limited(),
            RetryDecision::BackOff {
                attempt: 2,
                delay: Duration::from_secs(2)
            }
        );

        assert_eq!(state.begin_attempt(), 3);
        assert_eq!(state.on_rate_limited(), RetryDecision::Exhausted);
        assert_eq!(state.attempts(), 3);
    }

    #[test]
    fn single_attempt_policy_never_backs_off() {
        let mut state = RetryState::new(RetryPolicy::new(1, Duration::from_millis(10)));
        state.begin_attempt();
        assert_eq!(state.on_rate_limited(), RetryDecision::Exhausted);
    }
}
