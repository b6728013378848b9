//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod admin;
pub mod health;
pub mod info;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use admin::{cleanup_handler, filter_info_handler};
pub use health::health_handler;
pub use info::info_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;
