//! Time-bounded memoization.
//!
//! # Key Types
//!
//! - [`TtlCache`] - A key/value map whose entries count as misses once older than the TTL
//! - [`Cached`] - A function paired with its own `TtlCache`
//! - [`CallKey`] - A canonical key for calls with several positional and named arguments
//!
//! Only successful results are stored. Stale entries are replaced on the next lookup and are
//! otherwise left in place; the map has no size bound.

mod cached;
mod finite;
mod key;
mod ttl;

pub use cached::Cached;
pub use key::{CacheKeyError, CallKey, CallKeyBuilder};
pub use ttl::{EntryState, TtlCache};
