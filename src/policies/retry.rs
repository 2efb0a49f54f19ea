//! # Bounded retry budget for opening a log source.
//!
//! A worker makes one initial attempt plus up to [`RetryPolicy::max_retries`]
//! retries, waiting [`BackoffPolicy::next`] between them. Once the budget is
//! spent the worker terminates without ever streaming.
//!
//! ```text
//! attempt 1 ── fail ── sleep(next(0)) ── attempt 2 ── ... ── attempt 1+max_retries ── fail ── give up
//! ```

use std::time::Duration;

use super::backoff::BackoffPolicy;

/// Retry budget and delay schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for RetryPolicy {
    /// Ten retries, one second apart.
    fn default() -> Self {
        Self {
            max_retries: 10,
            backoff: BackoffPolicy::default(),
        }
    }
}

impl RetryPolicy {
    /// Total attempts including the first one.
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay to wait after failed attempt `attempt` (1-based), or `None` when
    /// the budget is spent.
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts() {
            None
        } else {
            Some(self.backoff.next(attempt.saturating_sub(1)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_eleven_attempts_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 11);
        for attempt in 1..11 {
            assert_eq!(policy.delay_after(attempt), Some(Duration::from_secs(1)));
        }
        assert_eq!(policy.delay_after(11), None);
    }

    #[test]
    fn zero_retries_gives_up_after_first_failure() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_after(1), None);
    }

    #[test]
    fn delays_follow_the_backoff_schedule() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff: BackoffPolicy {
                first: Duration::from_millis(10),
                max: Duration::from_millis(25),
                factor: 2.0,
            },
        };
        assert_eq!(policy.delay_after(1), Some(Duration::from_millis(10)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_millis(20)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_millis(25)));
        assert_eq!(policy.delay_after(4), None);
    }
}
