//! Domain layer containing business entities and contracts.
//!
//! This module defines the link model, the durable store contract, and the
//! access-count event pipeline, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Store contract definitions
//! - [`access_event`] - Access event model
//! - [`access_worker`] - Background access-count worker
//!
//! # Access Counting Flow
//!
//! 1. A cache-hit resolution produces an [`access_event::AccessEvent`]
//! 2. The event is pushed onto a bounded channel without waiting
//! 3. [`access_worker::run_access_worker`] applies increments with bounded concurrency
//! 4. Counts are persisted via [`repositories::LinkRepository::increment_access_count`]

pub mod access_event;
pub mod access_worker;
pub mod entities;
pub mod repositories;
