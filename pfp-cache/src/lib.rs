//! TTL cache for upstream records.
//!
//! [`TtlCache`] is a thread-safe keyed store whose entries vanish once their
//! TTL has elapsed. [`TtlCache::cached_fetch`] wraps a fallible async fetch
//! with it: hits skip the fetch, successes are stored, failures never are.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod coordinator;

pub use cache::{CacheStats, TtlCache};
