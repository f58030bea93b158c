//! Execution timing with structured log output.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Measures wall-clock time since it was started.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
}

impl Stopwatch {
    /// Start a new stopwatch
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}

/// Logs the elapsed time when dropped, so panics and cancelled futures are reported too.
struct TimingGuard<'a> {
    name: &'a str,
    stopwatch: Stopwatch,
}

impl<'a> TimingGuard<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            stopwatch: Stopwatch::start(),
        }
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        let elapsed = self.stopwatch.elapsed();
        tracing::info!(
            elapsed_ms = elapsed.as_millis() as u64,
            panicked = std::thread::panicking(),
            "{} executed in {:.4}s",
            self.name,
            elapsed.as_secs_f64()
        );
    }
}

/// Run `operation` and log how long it took under `name`.
///
/// The result (or panic) of the operation passes through untouched.
///
/// # Examples
///
/// ```rust
/// use monorepo_core::timed::timed;
///
/// let total = timed("sum", || (1..=10).sum::<u32>());
/// assert_eq!(total, 55);
/// ```
pub fn timed<T, F>(name: &str, operation: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = TimingGuard::new(name);
    operation()
}

/// Await `future` and log how long it took under `name`.
///
/// Timing starts when the returned future is first polled. If it is dropped before completing,
/// the time up to the drop is logged.
pub async fn timed_async<F>(name: &str, future: F) -> F::Output
where
    F: Future,
{
    let _guard = TimingGuard::new(name);
    future.await
}
