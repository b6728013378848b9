//! Shared application state injected into every handler.

use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::application::services::LinkService;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    /// SHA-256 of `ADMIN_TOKEN`; `None` leaves admin routes open.
    pub admin_token_digest: Option<[u8; 32]>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, admin_token: Option<&str>) -> Self {
        Self {
            link_service,
            admin_token_digest: admin_token.map(token_digest),
        }
    }
}

/// Hashes a bearer token for comparison against the configured admin token.
pub fn token_digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}
