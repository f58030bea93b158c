#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core building blocks shared by monorepo services.
//!
//! This crate provides:
//!
//! - **Retry with exponential backoff** via the `BackoffStrategy` trait and `RetryPolicy`
//!   - Bounded attempts, delay capping, and jitter
//!   - Predicates that pick which failures are retryable
//! - **Time-bounded memoization** via `TtlCache` and the `Cached` function wrapper
//! - **Execution timing** via `timed` and `timed_async`
//! - **Service, repository, and entity traits** for business-logic and data-access layers
//! - **Utilities** for ids, slugs, and JSON maps
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use monorepo_core::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::builder()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(100))
//!     .build();
//!
//! let mut lookups = Cached::new(Duration::from_secs(300), |id: &u64| {
//!     let id = *id;
//!     async move { Ok::<_, std::io::Error>(format!("user-{id}")) }
//! });
//!
//! let id = policy.execute(|| async {
//!     Ok::<_, std::io::Error>(42)
//! }).await?;
//! let user = timed_async("load_user", lookups.try_call_async(id)).await?;
//! assert_eq!(user, "user-42");
//! # Ok(())
//! # }
//! ```

pub mod base;
pub mod cache;
pub mod retry;
pub mod timed;
pub mod utils;

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use monorepo_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::base::{Entity, Repository, Service};
    pub use crate::cache::{Cached, CallKey, TtlCache};
    pub use crate::retry::{BackoffStrategy, RetryPolicy, RetryPolicyBuilder};
    pub use crate::timed::{Stopwatch, timed, timed_async};
}
