//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, expiry sweep and aggregate stats

pub mod pg_link_repository;

pub use pg_link_repository::PgLinkRepository;
