//! HTTP middleware for request processing and protection.
//!
//! Provides admin authentication, CORS, rate limiting, request deadlines
//! and observability middleware.

pub mod auth;
pub mod cors;
pub mod deadline;
pub mod rate_limit;
pub mod tracing;
