//! Retry policy with exponential backoff.

use super::strategy::BackoffStrategy;
use monorepo_shared::constants::DEFAULT_RETRY_ATTEMPTS;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Classifies a failure as retryable (`true`) or fatal (`false`).
pub type RetryPredicate = Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>;

/// Retry policy with exponentially growing delays.
///
/// The operation is invoked at most `max_attempts` times. After a retryable failure the policy
/// waits, then tries again; the wait starts at `initial_delay` and is multiplied by
/// `backoff_multiplier` after every failed attempt.
///
/// # Mathematical Formula
///
/// For attempt `k` (1-indexed, `k >= 2`):
/// ```text
/// base_delay   = initial_delay * backoff_multiplier ^ (k - 2)
/// capped_delay = min(base_delay, max_delay)            (only when max_delay is set)
/// final_delay  = capped_delay * (1 + jitter * random(-1.0, +1.0))
/// ```
///
/// Jitter defaults to 0, so by default the schedule is exact.
///
/// # Examples
///
/// ```rust
/// use monorepo_core::retry::{BackoffStrategy, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Defaults: 3 attempts, 1s initial delay, multiplier 2.0
/// let policy = RetryPolicy::default();
/// assert_eq!(
///     policy.delays().collect::<Vec<_>>(),
///     vec![Duration::from_secs(1), Duration::from_secs(2)]
/// );
///
/// // Only retry I/O errors
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(100))
///     .retry_on::<std::io::Error>()
///     .build();
///
/// let result = policy.execute(|| async {
///     Ok::<_, std::io::Error>(42)
/// }).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Option<Duration>,
    jitter: f64,
    predicates: Vec<RetryPredicate>,
}

impl RetryPolicy {
    /// Create a new builder for configuring a retry policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use monorepo_core::retry::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::builder()
    ///     .max_attempts(5)
    ///     .initial_delay(Duration::from_millis(100))
    ///     .build();
    /// ```
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Initial delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Factor applied to the delay after each failed attempt.
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// The waits between consecutive attempts, in order.
    ///
    /// Yields `max_attempts - 1` delays. With jitter configured every call draws fresh values.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_attempts.saturating_sub(1)).map(|retry| self.next_delay(retry))
    }

    fn base_delay(&self, retry: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        let delay = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        match self.max_delay {
            Some(max_delay) => delay.min(max_delay),
            None => delay,
        }
    }
}

impl Default for RetryPolicy {
    /// Defaults:
    /// - `max_attempts`: 3
    /// - `initial_delay`: 1s
    /// - `backoff_multiplier`: 2.0 (doubles each time)
    /// - `max_delay`: none
    /// - `jitter`: 0.0
    /// - retries every failure
    fn default() -> Self {
        RetryPolicyBuilder::default().build()
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("jitter", &self.jitter)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl BackoffStrategy for RetryPolicy {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn next_delay(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if self.jitter <= 0.0 {
            return base;
        }

        // base * jitter * random(-1.0, +1.0), giving [base * (1 - jitter), base * (1 + jitter)]
        let base_secs = base.as_secs_f64();
        let jitter_amount = base_secs * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
        Duration::try_from_secs_f64((base_secs + jitter_amount).max(0.0)).unwrap_or(base)
    }

    fn should_retry(&self, error: &(dyn Error + 'static)) -> bool {
        self.predicates.is_empty() || self.predicates.iter().any(|retryable| retryable(error))
    }
}

/// Builder for configuring a [`RetryPolicy`].
///
/// # Examples
///
/// ```rust
/// use monorepo_core::retry::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(100))
///     .backoff_multiplier(1.5)
///     .max_delay(Duration::from_secs(30))
///     .jitter(0.1)
///     .retry_if(|err| err.to_string().contains("timeout"))
///     .build();
/// ```
#[derive(Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    initial_delay: Option<Duration>,
    backoff_multiplier: Option<f64>,
    max_delay: Option<Duration>,
    jitter: Option<f64>,
    predicates: Vec<RetryPredicate>,
}

impl RetryPolicyBuilder {
    /// Set the total number of attempts, including the first.
    ///
    /// `1` disables retrying. `0` is treated as `1`.
    ///
    /// Default: 3
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Set the delay before the first retry.
    ///
    /// Default: 1s
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the factor applied to the delay after each failed attempt.
    ///
    /// Values below 1.0 (and non-finite values) are raised to 1.0 so delays never shrink.
    ///
    /// Default: 2.0
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = Some(multiplier);
        self
    }

    /// Cap every delay at `delay`.
    ///
    /// Default: no cap
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the jitter factor (0.0 to 1.0). A jitter of 0.1 lets each delay vary by ±10%.
    ///
    /// Default: 0.0
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(if jitter.is_nan() {
            0.0
        } else {
            jitter.clamp(0.0, 1.0)
        });
        self
    }

    /// Retry failures for which `predicate` returns `true`.
    ///
    /// Predicates added with `retry_if` and [`retry_on`](Self::retry_on) are OR-ed together. With
    /// none installed every failure is retried.
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Retry failures whose concrete type is `T`.
    ///
    /// Call it several times to retry several error types.
    pub fn retry_on<T>(self) -> Self
    where
        T: Error + 'static,
    {
        self.retry_if(|error| error.is::<T>())
    }

    /// Build the [`RetryPolicy`].
    ///
    /// Uses default values for any unset parameters.
    pub fn build(self) -> RetryPolicy {
        let backoff_multiplier = match self.backoff_multiplier {
            Some(m) if m.is_finite() && m >= 1.0 => m,
            Some(_) => 1.0,
            None => 2.0,
        };

        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS).max(1),
            initial_delay: self.initial_delay.unwrap_or(Duration::from_secs(1)),
            backoff_multiplier,
            max_delay: self.max_delay,
            jitter: self.jitter.unwrap_or(0.0),
            predicates: self.predicates,
        }
    }
}
