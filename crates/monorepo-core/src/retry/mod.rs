//! Retry policies with exponential backoff.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - The retry loop, in async and blocking flavours
//! - [`RetryPolicy`] - Bounded attempts with exponentially growing delays and a retryable-failure
//!   predicate
//!
//! # Examples
//!
//! ```rust
//! use monorepo_core::retry::{BackoffStrategy, RetryPolicy};
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::builder()
//!     .max_attempts(3)
//!     .initial_delay(Duration::from_millis(10))
//!     .build();
//!
//! let mut calls = 0;
//! let value = policy.execute_blocking(|| {
//!     calls += 1;
//!     if calls < 2 {
//!         Err(std::io::Error::other("flaky"))
//!     } else {
//!         Ok(calls)
//!     }
//! });
//! assert_eq!(value.unwrap(), 2);
//! ```

mod policy;
mod strategy;

pub use policy::{RetryPolicy, RetryPolicyBuilder, RetryPredicate};
pub use strategy::BackoffStrategy;
