//! Short code allocation, resolution and housekeeping.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::access_event::AccessEvent;
use crate::domain::entities::{Link, LinkStats, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::filter::{FilterInfo, MembershipFilter};
use crate::utils::code_generator::{CUSTOM_CODE_MAX_LENGTH, CodeGenerator, validate_custom_code};
use crate::utils::url_normalizer::normalize_url;

/// Upper bound on random code draws per create request.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Cache key for a code's target URL.
pub fn cache_key(code: &str) -> String {
    format!("shorturl:{code}")
}

/// Settings the service needs from the process configuration.
#[derive(Debug, Clone)]
pub struct LinkSettings {
    /// Public prefix for short URLs, without trailing slash.
    pub base_url: String,
    pub code_length: usize,
    pub cache_ttl: Duration,
}

impl From<&Config> for LinkSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            code_length: config.code_length,
            cache_ttl: Duration::from_secs(config.cache_ttl_seconds),
        }
    }
}

/// Input for [`LinkService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub url: String,
    /// Empty string is treated as absent.
    pub custom_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a successful create.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSummary {
    pub short_url: String,
    pub code: String,
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Collaborator status reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub store: bool,
    pub cache: bool,
    pub filter: bool,
    pub queue_open: bool,
    pub queue_capacity: usize,
    pub queue_available: usize,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.store && self.cache && self.filter && self.queue_open
    }
}

/// Orchestrates the store, membership filter and cache.
///
/// The store is authoritative. The filter and cache are accelerators: their
/// failures are logged and never change the outcome a caller sees.
///
/// # Create
///
/// Normalizes the URL, then either validates a custom code or draws random
/// codes (at most [`MAX_GENERATION_ATTEMPTS`]). Each candidate is checked
/// against the filter first; only "possibly present" answers or filter
/// errors reach the store. After insert, the code is registered in the
/// filter and the cache is warmed.
///
/// # Resolve
///
/// Cache-aside. A cache hit queues an access event and returns immediately;
/// a miss reads the store, rejects expired links, warms the cache and
/// increments the access count inline.
pub struct LinkService<R: LinkRepository + ?Sized = dyn LinkRepository> {
    repository: Arc<R>,
    filter: Arc<dyn MembershipFilter>,
    cache: Arc<dyn CacheService>,
    access_sender: mpsc::Sender<AccessEvent>,
    generator: CodeGenerator,
    settings: LinkSettings,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    pub fn new(
        repository: Arc<R>,
        filter: Arc<dyn MembershipFilter>,
        cache: Arc<dyn CacheService>,
        access_sender: mpsc::Sender<AccessEvent>,
        settings: LinkSettings,
    ) -> Self {
        Self {
            repository,
            filter,
            cache,
            access_sender,
            generator: CodeGenerator::new(settings.code_length),
            settings,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Creates a short link.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed URL or custom code
    /// - `Conflict` if the custom code is taken, including a lost insert race
    /// - `Internal` if no free code was found or the store failed
    pub async fn create(&self, request: CreateLink) -> Result<LinkSummary, AppError> {
        let target_url = normalize_url(&request.url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let code = match request.custom_code.filter(|c| !c.is_empty()) {
            Some(custom) => {
                validate_custom_code(&self.generator, &custom)?;

                if self.code_exists(&custom).await? {
                    return Err(AppError::conflict(
                        "Short code already exists",
                        json!({ "code": custom }),
                    ));
                }

                custom
            }
            None => self.allocate_code().await?,
        };

        let link = self
            .repository
            .insert(NewLink {
                code,
                target_url,
                expires_at: request.expires_at,
            })
            .await?;

        info!(code = %link.code, "Short link created");

        if let Err(e) = self.filter.add(&link.code).await {
            warn!(code = %link.code, "Failed to register code in membership filter: {}", e);
        }
        self.warm_cache(&link, Utc::now()).await;

        Ok(LinkSummary {
            short_url: self.short_url(&link.code),
            code: link.code,
            target_url: link.target_url,
            expires_at: link.expires_at,
            created_at: link.created_at,
        })
    }

    /// Resolves a code to its target URL.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the code is malformed or unknown
    /// - `Expired` if the link is past its expiry
    /// - `Internal` if the store failed
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !self.is_resolvable(code) {
            return Err(not_found(code));
        }

        let key = cache_key(code);
        match self.cache.get(&key).await {
            Ok(Some(target_url)) => {
                self.record_access(code);
                return Ok(target_url);
            }
            Ok(None) => {}
            Err(e) => warn!(code, "Cache lookup failed, falling back to store: {}", e),
        }

        let link = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        let now = Utc::now();
        if link.is_expired_at(now) {
            return Err(AppError::expired(
                "Short link has expired",
                json!({ "code": code, "expires_at": link.expires_at }),
            ));
        }

        self.warm_cache(&link, now).await;

        if let Err(e) = self.repository.increment_access_count(code).await {
            warn!(code, "Failed to increment access count: {}", e);
        }

        Ok(link.target_url)
    }

    /// Returns stored metadata, including for expired links.
    pub async fn info(&self, code: &str) -> Result<Link, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    pub async fn stats(&self) -> Result<LinkStats, AppError> {
        self.repository.aggregate_stats(Utc::now()).await
    }

    /// Deletes links whose expiry is strictly in the past.
    pub async fn clean_expired(&self) -> Result<u64, AppError> {
        let deleted = self.repository.delete_expired(Utc::now()).await?;
        info!(deleted, "Expired links cleaned up");
        Ok(deleted)
    }

    /// Seeds the membership filter with every stored code.
    ///
    /// Pages through the store `page_size` rows at a time. Returns the
    /// number of codes submitted.
    pub async fn warm_filter(&self, page_size: i64) -> Result<usize, AppError> {
        let page_size = page_size.max(1);
        let to = Utc::now();
        let mut offset = 0;
        let mut total = 0;

        loop {
            let page = self
                .repository
                .list_by_time_range(DateTime::<Utc>::UNIX_EPOCH, to, page_size, offset)
                .await?;

            let codes: Vec<String> = page.into_iter().map(|link| link.code).collect();
            if !codes.is_empty() {
                self.filter.add_many(&codes).await.map_err(|e| {
                    AppError::internal(
                        "Failed to seed membership filter",
                        json!({ "reason": e.to_string() }),
                    )
                })?;
            }

            total += codes.len();
            if (codes.len() as i64) < page_size {
                break;
            }
            offset += page_size;
        }

        debug!(total, "Membership filter seeded from store");
        Ok(total)
    }

    pub async fn filter_info(&self) -> Result<FilterInfo, AppError> {
        self.filter.info().await.map_err(|e| {
            AppError::internal(
                "Membership filter unavailable",
                json!({ "reason": e.to_string() }),
            )
        })
    }

    pub async fn health(&self) -> HealthReport {
        let store = match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Store health check failed: {}", e);
                false
            }
        };
        let cache = self.cache.health_check().await;
        let filter = self.filter.info().await.is_ok();

        HealthReport {
            store,
            cache,
            filter,
            queue_open: !self.access_sender.is_closed(),
            queue_capacity: self.access_sender.max_capacity(),
            queue_available: self.access_sender.capacity(),
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.settings.base_url, code)
    }

    /// Two-tier existence check: filter first, store on "maybe" or filter error.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        match self.filter.exists(code).await {
            Ok(false) => return Ok(false),
            Ok(true) => {}
            Err(e) => warn!(code, "Membership filter check failed, falling back to store: {}", e),
        }

        self.repository.exists(code).await
    }

    async fn allocate_code(&self) -> Result<String, AppError> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code = self.generator.generate_random().map_err(|e| {
                AppError::internal(
                    "Failed to generate short code",
                    json!({ "reason": e.to_string() }),
                )
            })?;

            if !self.code_exists(&code).await? {
                return Ok(code);
            }

            debug!(attempt, code = %code, "Generated code already in use");
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }

    /// Caches the target, never past the link's expiry.
    async fn warm_cache(&self, link: &Link, now: DateTime<Utc>) {
        let key = cache_key(&link.code);

        let result = match link.expires_at {
            None => self.cache.set_default(&key, &link.target_url).await,
            Some(expires_at) => {
                let remaining = (expires_at - now).to_std().unwrap_or_default();
                if remaining.as_secs() == 0 {
                    return;
                }
                let ttl = remaining.min(self.settings.cache_ttl);
                self.cache.set(&key, &link.target_url, ttl).await
            }
        };

        if let Err(e) = result {
            warn!(code = %link.code, "Failed to warm cache: {}", e);
        }
    }

    fn record_access(&self, code: &str) {
        match self.access_sender.try_send(AccessEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(code = %event.code, "Access queue full, dropping event")
            }
            Err(TrySendError::Closed(event)) => {
                warn!(code = %event.code, "Access queue closed, dropping event")
            }
        }
    }

    fn is_resolvable(&self, code: &str) -> bool {
        !code.is_empty()
            && code.len() <= CUSTOM_CODE_MAX_LENGTH
            && self.generator.is_valid_code(code)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
