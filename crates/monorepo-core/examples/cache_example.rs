//! Example: memoizing lookups with `Cached` and timing them with `timed_async`
//!
//! Run with:
//! ```bash
//! RUST_LOG=info cargo run -p monorepo-core --example cache_example
//! ```

use monorepo_core::prelude::*;
use std::time::Duration;

/// Pretend database lookup that takes a while
async fn load_profile(user_id: u64) -> String {
    tokio::time::sleep(Duration::from_millis(200)).await;
    format!("profile for user {user_id}")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut profiles = Cached::new(Duration::from_secs(1), |id: &u64| load_profile(*id));

    for round in 1..=3 {
        let profile = timed_async("load_profile", profiles.call_async(7)).await;
        println!("round {round}: {profile}");
    }

    println!("\nWaiting for the entry to expire...");
    tokio::time::sleep(Duration::from_millis(1100)).await;
    let profile = timed_async("load_profile", profiles.call_async(7)).await;
    println!("after expiry: {profile}");

    let key = CallKey::builder()
        .arg(&"search")
        .and_then(|key| key.kwarg("page", &2))
        .and_then(|key| key.kwarg("query", "rust"))
        .map(|key| key.build());
    match key {
        Ok(key) => println!("\nmulti-argument key: {key}"),
        Err(e) => eprintln!("failed to build key: {e}"),
    }
}
