//! Example: retrying flaky operations with `RetryPolicy`
//!
//! This example demonstrates:
//! 1. Exponential backoff until an operation succeeds
//! 2. Retrying only selected failure types
//! 3. Jitter spreading the delays of concurrent callers
//!
//! Run with:
//! ```bash
//! RUST_LOG=warn cargo run -p monorepo-core --example retry_example
//! ```

use monorepo_core::prelude::*;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

/// Failure raised by the simulated upstream when it is briefly unavailable
#[derive(Debug)]
struct Unavailable;

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("service unavailable")
    }
}

impl Error for Unavailable {}

/// A simulated upstream that fails the first few calls
struct FlakyUpstream {
    calls: AtomicU32,
    fail_count: u32,
}

impl FlakyUpstream {
    fn new(fail_count: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_count,
        }
    }

    async fn fetch(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.fail_count {
            println!("  Attempt {call}: FAILED");
            Err(Box::new(Unavailable))
        } else {
            println!("  Attempt {call}: SUCCESS");
            Ok("payload".to_string())
        }
    }

    fn total_calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Boxed errors do not implement `Error`, so the example wraps them.
#[derive(Debug)]
struct FetchError(Box<dyn Error + Send + Sync>);

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Error for FetchError {}

/// Example 1: Backoff until success
async fn example_backoff() -> anyhow::Result<()> {
    println!("\n=== Example 1: Exponential Backoff ===\n");

    let policy = RetryPolicy::builder()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(100))
        .backoff_multiplier(2.0)
        .build();

    let upstream = FlakyUpstream::new(2);
    let start = Instant::now();

    let result = policy
        .execute(|| {
            let upstream = &upstream;
            async move { upstream.fetch().await.map_err(FetchError) }
        })
        .await?;

    println!("\nResult: {result}");
    println!("Total calls: {}", upstream.total_calls());
    println!("Total time: {:?}", start.elapsed());
    println!("Expected delays: 100ms + 200ms = ~300ms");

    Ok(())
}

/// Example 2: Only retry selected failures
async fn example_retry_on() -> anyhow::Result<()> {
    println!("\n=== Example 2: Retry Only Timeouts ===\n");

    let policy = RetryPolicy::builder()
        .max_attempts(4)
        .initial_delay(Duration::from_millis(10))
        .retry_if(|error| {
            error
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::TimedOut)
        })
        .build();

    println!("Permission error (not retried):");
    let calls = AtomicU32::new(0);
    let result = policy
        .execute(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<(), _>(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "auth failed",
                ))
            }
        })
        .await;
    println!("  {result:?} after {} call(s)", calls.load(Ordering::SeqCst));

    println!("\nTimeout (retried):");
    let calls = AtomicU32::new(0);
    let result = policy
        .execute(|| {
            let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if call < 3 {
                    Err(std::io::Error::from(std::io::ErrorKind::TimedOut))
                } else {
                    Ok("connected")
                }
            }
        })
        .await;
    println!("  {result:?} after {} call(s)", calls.load(Ordering::SeqCst));

    Ok(())
}

/// Example 3: Jitter
fn example_jitter() {
    println!("\n=== Example 3: Jitter ===\n");

    let steady = RetryPolicy::builder()
        .max_attempts(4)
        .initial_delay(Duration::from_millis(100))
        .build();
    let jittered = RetryPolicy::builder()
        .max_attempts(4)
        .initial_delay(Duration::from_millis(100))
        .jitter(0.3)
        .build();

    for retry in 0..3 {
        println!(
            "  Retry {}: steady {:?}, jittered {:?}",
            retry + 1,
            steady.next_delay(retry),
            jittered.next_delay(retry)
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    example_backoff().await?;
    example_retry_on().await?;
    example_jitter();

    Ok(())
}
