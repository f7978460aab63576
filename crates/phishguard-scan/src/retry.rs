//! Bounded retry policies for the analyzer and history calls.

use std::time::Duration;

/// How the wait between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// The same delay after every failed attempt
    Fixed,
    /// `delay × attempt` after the n-th failed attempt
    Linear,
}

/// A bounded retry policy.
///
/// `max_attempts` counts every call including the first, and is never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
    backoff: Backoff,
}

impl RetryPolicy {
    /// A single attempt, no retry.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
            backoff: Backoff::Fixed,
        }
    }

    /// Up to `max_attempts` calls with the same `delay` between them.
    #[must_use]
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
            backoff: Backoff::Fixed,
        }
    }

    /// Up to `max_attempts` calls, waiting `step × n` after the n-th failure.
    #[must_use]
    pub fn linear(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay: step,
            backoff: Backoff::Linear,
        }
    }

    /// Total number of calls allowed.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff shape.
    #[must_use]
    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Wait before the next call after `attempt` (1-based) failed.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Linear => self.delay.saturating_mul(attempt.max(1)),
        }
    }

    /// Sum of all waits if every attempt fails.
    #[must_use]
    pub fn total_delay(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.delay_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.total_delay(), Duration::ZERO);
    }

    #[test]
    fn test_fixed_delay_does_not_grow() {
        let policy = RetryPolicy::fixed(3, Duration::from_millis(300));
        assert_eq!(policy.delay_for(1), Duration::from_millis(300));
        assert_eq!(policy.delay_for(2), Duration::from_millis(300));
        // two waits between three attempts
        assert_eq!(policy.total_delay(), Duration::from_millis(600));
    }

    #[test]
    fn test_linear_backoff() {
        let policy = RetryPolicy::linear(4, Duration::from_millis(500));
        assert_eq!(policy.backoff(), Backoff::Linear);
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(1500));
        assert_eq!(policy.total_delay(), Duration::from_millis(3000));
    }

    #[test]
    fn test_attempts_never_zero() {
        assert_eq!(RetryPolicy::fixed(0, Duration::ZERO).max_attempts(), 1);
        assert_eq!(RetryPolicy::linear(0, Duration::ZERO).max_attempts(), 1);
    }
}
