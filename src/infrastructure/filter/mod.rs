//! Probabilistic membership filters for short code allocation.
//!
//! Provides a [`MembershipFilter`] trait with two backends:
//! - [`RedisBloomFilter`] - shared filter stored in Redis via the RedisBloom module
//! - [`MemoryBloomFilter`] - process-local filter backed by the `bloomfilter` crate

mod memory_bloom;
mod redis_bloom;
mod service;

pub use memory_bloom::MemoryBloomFilter;
pub use redis_bloom::RedisBloomFilter;
pub use service::{FilterError, FilterInfo, FilterResult, MembershipFilter};

#[cfg(test)]
pub use service::MockMembershipFilter;
