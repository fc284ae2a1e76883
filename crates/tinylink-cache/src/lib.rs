//! Cache adapters for link lookups.
//!
//! [`MokaLinkCache`] keeps entries in process memory, [`RedisLinkCache`]
//! shares them through Redis, and [`LayeredCache`] stacks the two.

pub mod layered;
pub mod moka;
pub mod redis;

pub use layered::LayeredCache;
pub use moka::{MokaLinkCache, MokaSettings};
pub use redis::RedisLinkCache;
pub use tinylink_core::{CacheError, LinkCache};
