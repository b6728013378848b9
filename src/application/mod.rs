//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating the store, the
//! membership filter and the cache. Services consume repository and
//! accelerator traits and provide a clean API for HTTP handlers and the
//! admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Code allocation, resolution, cleanup and stats

pub mod services;
