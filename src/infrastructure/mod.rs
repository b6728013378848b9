//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching and membership filtering.
//!
//! # Modules
//!
//! - [`cache`] - Caching abstractions (Redis and no-op implementations)
//! - [`filter`] - Probabilistic membership filters (RedisBloom and in-memory)
//! - [`persistence`] - PostgreSQL repository implementation
//! - [`redis`] - Shared Redis connection setup

pub mod cache;
pub mod filter;
pub mod persistence;
pub mod redis;
