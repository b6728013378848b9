//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the durable store behind the Repository pattern.
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Testing
//!
//! See `tests/repository_link.rs` for store-backed tests.

pub mod link_repository;

pub use link_repository::LinkRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
