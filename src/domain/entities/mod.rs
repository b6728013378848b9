//! Core domain entities.
//!
//! - [`Link`] - A short code mapped to a target URL
//! - [`NewLink`] - Input for creating a link
//! - [`LinkStatus`] - Time-derived lifecycle state
//! - [`LinkStats`] - Aggregate counts over all links

pub mod link;
pub mod link_stats;

pub use link::{Link, LinkStatus, NewLink};
pub use link_stats::LinkStats;
